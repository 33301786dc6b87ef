//! Card and keyword associations for the current date, sign and bodies.

use alchm_core::{Body, ZodiacSign};
use serde::Serialize;

use crate::dominant::DominantBody;
use crate::tables::{AlignmentTables, MinorCard};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyCard {
    pub body: Body,
    pub card: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolicAssociations {
    /// Card of the decan covering the date. `None` only for dates outside
    /// the calendar.
    pub decan_card: Option<MinorCard>,
    pub sign_card: &'static str,
    pub keywords: Vec<&'static str>,
    /// One entry per dominant body, in dominant-list order.
    pub body_cards: Vec<BodyCard>,
}

impl SymbolicAssociations {
    /// Display name of the decan card, if any.
    pub fn decan_card_name(&self) -> Option<String> {
        self.decan_card.map(|c| c.to_string())
    }
}

pub fn calculate_symbolic_associations(
    tables: &AlignmentTables,
    month0: u32,
    day: u32,
    sign: ZodiacSign,
    dominant: &[DominantBody],
) -> SymbolicAssociations {
    let decan_card = tables.decan(month0, day).map(|d| d.card);
    if decan_card.is_none() {
        tracing::warn!(month0, day, "no decan window covers date");
    }
    SymbolicAssociations {
        decan_card,
        sign_card: tables.sign_card(sign),
        keywords: tables.sign_keywords(sign).to_vec(),
        body_cards: dominant
            .iter()
            .map(|d| BodyCard {
                body: d.body,
                card: tables.body_card(d.body),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::Suit;

    #[test]
    fn new_year_falls_in_capricorn_first_decan() {
        let t = AlignmentTables::default();
        let s = calculate_symbolic_associations(&t, 0, 1, ZodiacSign::Capricorn, &[]);
        assert_eq!(s.decan_card, Some(MinorCard::new(Suit::Pentacles, 2)));
        assert_eq!(s.sign_card, "The Devil");
        assert_eq!(s.keywords, vec!["discipline", "tradition", "structure"]);
        assert!(s.body_cards.is_empty());
    }

    #[test]
    fn body_cards_follow_dominant_order() {
        let t = AlignmentTables::default();
        let dom = [
            DominantBody::new(Body::Venus, 0.7),
            DominantBody::new(Body::Venus, 0.5),
            DominantBody::new(Body::Pluto, 0.1),
        ];
        let s = calculate_symbolic_associations(&t, 6, 30, ZodiacSign::Leo, &dom);
        assert_eq!(s.decan_card_name().as_deref(), Some("Five of Wands"));
        let cards: Vec<&str> = s.body_cards.iter().map(|c| c.card).collect();
        assert_eq!(cards, vec!["The Empress", "The Empress", "Judgement"]);
    }

    #[test]
    fn out_of_calendar_has_no_decan() {
        let t = AlignmentTables::default();
        let s = calculate_symbolic_associations(&t, 13, 1, ZodiacSign::Aries, &[]);
        assert_eq!(s.decan_card, None);
    }
}
