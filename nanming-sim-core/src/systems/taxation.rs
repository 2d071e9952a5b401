use crate::fixed::Fixed;
use crate::state::Province;
use tracing::instrument;

/// Annual gross tax income of all provinces, in treasury units.
///
/// Formula: Σ (land + salt + merchant + maritime + misc)
#[instrument(skip_all, name = "taxation")]
pub fn annual_income<'a>(provinces: impl IntoIterator<Item = &'a Province>) -> Fixed {
    let total: u64 = provinces.into_iter().map(|p| p.taxes.total()).sum();
    Fixed::from_int(total as i64)
}
