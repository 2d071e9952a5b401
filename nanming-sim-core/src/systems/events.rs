//! Narrative event triggering.

use crate::state::{CalendarDate, OrdSet};
use nanming_data::EventDef;

/// Whether `event` may fire on `date`.
///
/// Events are anchored to `epoch_year`: during that year an event waits for
/// its trigger month, and in any later year every event is eligible at once.
/// The later-year catch-up is intentional; unresolved events fire one per
/// eligible tick regardless of their trigger month.
pub fn is_eligible(event: &EventDef, date: CalendarDate, epoch_year: i32) -> bool {
    date.year > epoch_year || (date.year == epoch_year && date.month >= event.trigger_month)
}

/// First unresolved, eligible event in declared catalog order.
pub fn next_triggered<'a>(
    events: &'a [EventDef],
    resolved: &OrdSet<String>,
    date: CalendarDate,
    epoch_year: i32,
) -> Option<&'a EventDef> {
    events
        .iter()
        .find(|event| !resolved.contains(&event.id) && is_eligible(event, date, epoch_year))
}
