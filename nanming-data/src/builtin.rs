//! The built-in catalog: the Southern Metropolitan region in the spring of 1644.

use crate::types::{
    EventDef, EventImpact, EventOption, Faction, Official, ProvinceDef, Stance, TaxDetails,
    Warlord,
};

/// Prefectures and independent departments, in display order.
pub const PREFECTURE_NAMES: [&str; 25] = [
    "Yingtian",
    "Suzhou",
    "Songjiang",
    "Yangzhou",
    "Changzhou",
    "Zhenjiang",
    "Huai'an",
    "Fengyang",
    "Huizhou",
    "Anqing",
    "Taiping",
    "Chizhou",
    "Luzhou",
    "Ningguo",
    "Xuzhou",
    "Guangde",
    "Hezhou",
    "Chuzhou",
    "Hangzhou",
    "Huzhou",
    "Jiaxing",
    "Shaoxing",
    "Ningbo",
    "Jinhua",
    "Quzhou",
];

/// Suzhou's fixed seed; every other prefecture is generated.
pub const SUZHOU_TAXES: TaxDetails = TaxDetails::new(70, 8, 15, 3, 4);

pub fn provinces() -> Vec<ProvinceDef> {
    PREFECTURE_NAMES
        .iter()
        .enumerate()
        .map(|(i, &name)| ProvinceDef {
            id: format!("pref-{i}"),
            name: name.to_string(),
            taxes: (name == "Suzhou").then_some(SUZHOU_TAXES),
        })
        .collect()
}

fn official(role: &str, name: &str, description: &str) -> Official {
    Official {
        role: role.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    }
}

/// Grand Secretary first, then the Six Ministries.
pub fn officials() -> Vec<Official> {
    vec![
        official(
            "Senior Grand Secretary",
            "Ma Shiying",
            "Holds the Fengyang command; credited with enthroning the Prince of Fu.",
        ),
        official(
            "Minister of Personnel",
            "Zhang Shenyan",
            "Steady and cautious, a leader of the Donglin faction.",
        ),
        official(
            "Minister of Revenue",
            "Gao Hongtu",
            "Incorruptible and blunt, an able financier.",
        ),
        official(
            "Minister of Rites",
            "Qian Qianyi",
            "Foremost of the three great poets of Jiangzuo, leader of the literati.",
        ),
        official(
            "Minister of War",
            "Shi Kefa",
            "Loyal to the core, directs the defense from Yangzhou.",
        ),
        official(
            "Minister of Justice",
            "Xie Xuelong",
            "Strict in law, a respected clean official.",
        ),
        official(
            "Minister of Works",
            "He Yingrui",
            "Practical scholar in charge of repairs and firearms.",
        ),
    ]
}

fn commander(
    name: &str,
    title: &str,
    location: &str,
    troops: Option<&str>,
    stance: Stance,
) -> Warlord {
    Warlord {
        name: name.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        troops: troops.map(str::to_string),
        stance,
    }
}

/// The four garrison commanders north of the Yangtze and Zuo Liangyu upriver.
pub fn ming_commanders() -> Vec<Warlord> {
    vec![
        commander("Gao Jie", "Earl of Xingping", "Sizhou", Some("30,000"), Stance::Peaceful),
        commander("Huang Degong", "Marquis of Jingnan", "Luzhou", Some("40,000"), Stance::Peaceful),
        commander("Liu Liangzuo", "Earl of Guangchang", "Linhuai", Some("25,000"), Stance::Peaceful),
        commander("Liu Zeqing", "Earl of Dongping", "Huai'an", Some("30,000"), Stance::Peaceful),
        commander("Zuo Liangyu", "Marquis of Ningnan", "Wuchang", Some("200,000"), Stance::Peaceful),
    ]
}

pub fn qing_commanders() -> Vec<Warlord> {
    vec![
        commander("Dodo", "Prince Yu", "Grand General Who Pacifies the Realm", None, Stance::Hostile),
        commander("Hooge", "Prince Su", "Campaigning in Sichuan", None, Stance::Hostile),
        commander("Ajige", "Prince Ying", "Pursuing the Shun army", None, Stance::Hostile),
        commander("Bolo", "Beile", "Dividing forces to march south", None, Stance::Hostile),
    ]
}

/// The Qing, followed by one faction per Ming commander.
pub fn factions() -> Vec<Faction> {
    let mut factions = vec![Faction {
        name: "Qing".to_string(),
        stance: Stance::Hostile,
        description: "The Manchu Eight Banners and Wu Sangui's surrendered army.".to_string(),
    }];
    factions.extend(ming_commanders().into_iter().map(|w| Faction {
        description: format!("{}, stationed at {}.", w.title, w.location),
        name: w.name,
        stance: Stance::Peaceful,
    }));
    factions
}

fn option(id: &str, text: &str, impact_description: &str, impact: EventImpact) -> EventOption {
    EventOption {
        id: id.to_string(),
        text: text.to_string(),
        impact_description: impact_description.to_string(),
        impact,
    }
}

fn impact(treasury: Option<i64>, prestige: Option<i64>, military: Option<i64>) -> EventImpact {
    EventImpact {
        treasury,
        prestige,
        military,
        loyalty: None,
    }
}

/// Scripted events in declared scan order.
pub fn events() -> Vec<EventDef> {
    vec![
        EventDef {
            id: "EVENT_01".to_string(),
            name: "The Prince of Fu Flees South".to_string(),
            trigger_month: 5,
            background: "In the fifth month of the seventeenth year of Chongzhen, the Prince of Fu, \
                         Zhu Yousong, reaches Pukou under the escort of Fengyang governor Ma Shiying. \
                         The court is divided: enthrone the Prince of Fu, or seek a worthier heir?"
                .to_string(),
            options: vec![
                option(
                    "A",
                    "Receive the Prince of Fu with full honors",
                    "Treasury -50, prestige +20, Ma Shiying's favor rises",
                    EventImpact {
                        loyalty: Some("Ma Shiying favors the court".to_string()),
                        ..impact(Some(-50), Some(20), None)
                    },
                ),
                option(
                    "B",
                    "Delay his entry and negotiate in secret",
                    "Prestige -10, events slow down",
                    impact(None, Some(-10), None),
                ),
                option(
                    "C",
                    "Back Shi Kefa in supporting the Prince of Lu",
                    "Prestige +30, risk of military disorder",
                    impact(None, Some(30), Some(-5_000)),
                ),
            ],
        },
        EventDef {
            id: "EVENT_02".to_string(),
            name: "The Succession Dispute".to_string(),
            trigger_month: 6,
            background: "The Prince of Fu is in Nanjing, yet the quarrel over choosing the worthy \
                         or the nearest kin peaks. The Donglin insist on the Prince of Lu while \
                         Ma Shiying marches his troops closer."
                .to_string(),
            options: vec![
                option(
                    "A",
                    "Accept the situation and crown the Hongguang Emperor",
                    "Prestige +10, the army stays calm",
                    impact(Some(-100), Some(10), None),
                ),
                option(
                    "B",
                    "Try to persuade Ma Shiying to withdraw",
                    "Low chance of success, high military risk",
                    impact(None, None, Some(-10_000)),
                ),
                option(
                    "C",
                    "Obstruct the enthronement by force",
                    "Prestige -50, the regime is shaken",
                    impact(Some(-200), Some(-50), None),
                ),
            ],
        },
    ]
}
