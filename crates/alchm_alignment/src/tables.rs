//! Fixed lookup tables behind the alignment calculator.
//!
//! Everything here is plain data. [`AlignmentTables::default`] builds the
//! standard set; callers may substitute their own at construction.

use std::fmt::{Display, Formatter};

use alchm_core::{Body, Element, ZodiacSign};
use serde::Serialize;

use crate::error::AlignmentError;

/// Weight of the weekday ruler in the dominant-body list.
pub const WEEKDAY_RULER_WEIGHT: f64 = 0.7;
/// Weight of the planetary-hour ruler.
pub const HOUR_RULER_WEIGHT: f64 = 0.5;
/// Weight of the Moon entry added at full moon.
pub const FULL_MOON_WEIGHT: f64 = 0.6;
/// Outer bodies always appended, with their fixed weights.
pub const OUTER_BODY_WEIGHTS: [(Body, f64); 3] =
    [(Body::Uranus, 0.2), (Body::Neptune, 0.15), (Body::Pluto, 0.1)];

/// Number of planetary hours in a day.
pub const HOUR_COUNT: usize = 24;

/// Weekday rulers, Sunday first.
pub const WEEKDAY_RULERS: [Body; 7] = [
    Body::Sun,
    Body::Moon,
    Body::Mars,
    Body::Mercury,
    Body::Jupiter,
    Body::Venus,
    Body::Saturn,
];

/// Descending Chaldean order starting from the Sun.
const CHALDEAN_FROM_SUN: [Body; 7] = [
    Body::Sun,
    Body::Venus,
    Body::Mercury,
    Body::Moon,
    Body::Saturn,
    Body::Jupiter,
    Body::Mars,
];

/// Ruler of each clock hour, cycling the Chaldean order from the Sun at 00h.
pub const HOUR_RULERS: [Body; HOUR_COUNT] = {
    let mut out = [Body::Sun; HOUR_COUNT];
    let mut i = 0;
    while i < HOUR_COUNT {
        out[i] = CHALDEAN_FROM_SUN[i % 7];
        i += 1;
    }
    out
};

/// `(month0, day)` with January = 0.
pub type MonthDay = (u32, u32);

/// Inclusive calendar window. A window whose end precedes its start wraps
/// through the new year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayWindow {
    pub start: MonthDay,
    pub end: MonthDay,
}

impl DayWindow {
    pub const fn new(start_month0: u32, start_day: u32, end_month0: u32, end_day: u32) -> Self {
        Self {
            start: (start_month0, start_day),
            end: (end_month0, end_day),
        }
    }

    pub fn wraps_year(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, month0: u32, day: u32) -> bool {
        let x = (month0, day);
        if self.wraps_year() {
            x >= self.start || x <= self.end
        } else {
            self.start <= x && x <= self.end
        }
    }
}

/// Tropical sun-sign calendar ranges.
pub const ZODIAC_RANGES: [(ZodiacSign, DayWindow); 12] = [
    (ZodiacSign::Aries, DayWindow::new(2, 21, 3, 19)),
    (ZodiacSign::Taurus, DayWindow::new(3, 20, 4, 20)),
    (ZodiacSign::Gemini, DayWindow::new(4, 21, 5, 20)),
    (ZodiacSign::Cancer, DayWindow::new(5, 21, 6, 22)),
    (ZodiacSign::Leo, DayWindow::new(6, 23, 7, 22)),
    (ZodiacSign::Virgo, DayWindow::new(7, 23, 8, 22)),
    (ZodiacSign::Libra, DayWindow::new(8, 23, 9, 22)),
    (ZodiacSign::Scorpio, DayWindow::new(9, 23, 10, 21)),
    (ZodiacSign::Sagittarius, DayWindow::new(10, 22, 11, 21)),
    (ZodiacSign::Capricorn, DayWindow::new(11, 22, 0, 19)),
    (ZodiacSign::Aquarius, DayWindow::new(0, 20, 1, 18)),
    (ZodiacSign::Pisces, DayWindow::new(1, 19, 2, 20)),
];

/// Sign used when no calendar range matches.
pub const FALLBACK_SIGN: ZodiacSign = ZodiacSign::Aries;

/// Minor-arcana suit, one per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Suit {
    Wands,
    Cups,
    Swords,
    Pentacles,
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Wands, Suit::Cups, Suit::Swords, Suit::Pentacles];

impl Suit {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wands => "Wands",
            Self::Cups => "Cups",
            Self::Swords => "Swords",
            Self::Pentacles => "Pentacles",
        }
    }

    pub const fn element(self) -> Element {
        match self {
            Self::Wands => Element::Fire,
            Self::Cups => Element::Water,
            Self::Swords => Element::Air,
            Self::Pentacles => Element::Earth,
        }
    }
}

/// A numbered minor card (ranks 2..=10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MinorCard {
    pub suit: Suit,
    pub rank: u8,
}

impl MinorCard {
    pub const fn new(suit: Suit, rank: u8) -> Self {
        Self { suit, rank }
    }
}

impl Display for MinorCard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        const RANKS: [&str; 11] = [
            "", "Ace", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
        ];
        let rank = RANKS.get(self.rank as usize).copied().unwrap_or("?");
        write!(f, "{rank} of {}", self.suit.name())
    }
}

/// One ten-day decan window and its card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecanWindow {
    pub card: MinorCard,
    pub window: DayWindow,
}

const fn decan(suit: Suit, rank: u8, window: DayWindow) -> DecanWindow {
    DecanWindow {
        card: MinorCard::new(suit, rank),
        window,
    }
}

/// 36 decans, grouped by suit, ranks ascending within each suit.
pub const DECANS: [DecanWindow; 36] = [
    decan(Suit::Wands, 2, DayWindow::new(2, 21, 2, 30)),
    decan(Suit::Wands, 3, DayWindow::new(2, 31, 3, 10)),
    decan(Suit::Wands, 4, DayWindow::new(3, 11, 3, 20)),
    decan(Suit::Wands, 5, DayWindow::new(6, 22, 7, 1)),
    decan(Suit::Wands, 6, DayWindow::new(7, 2, 7, 11)),
    decan(Suit::Wands, 7, DayWindow::new(7, 12, 7, 22)),
    decan(Suit::Wands, 8, DayWindow::new(10, 23, 11, 2)),
    decan(Suit::Wands, 9, DayWindow::new(11, 3, 11, 12)),
    decan(Suit::Wands, 10, DayWindow::new(11, 13, 11, 21)),
    decan(Suit::Cups, 2, DayWindow::new(5, 21, 6, 1)),
    decan(Suit::Cups, 3, DayWindow::new(6, 2, 6, 11)),
    decan(Suit::Cups, 4, DayWindow::new(6, 12, 6, 21)),
    decan(Suit::Cups, 5, DayWindow::new(9, 23, 10, 1)),
    decan(Suit::Cups, 6, DayWindow::new(10, 2, 10, 12)),
    decan(Suit::Cups, 7, DayWindow::new(10, 13, 10, 22)),
    decan(Suit::Cups, 8, DayWindow::new(1, 19, 1, 29)),
    decan(Suit::Cups, 9, DayWindow::new(2, 1, 2, 10)),
    decan(Suit::Cups, 10, DayWindow::new(2, 11, 2, 20)),
    decan(Suit::Swords, 2, DayWindow::new(8, 23, 9, 2)),
    decan(Suit::Swords, 3, DayWindow::new(9, 3, 9, 12)),
    decan(Suit::Swords, 4, DayWindow::new(9, 13, 9, 22)),
    decan(Suit::Swords, 5, DayWindow::new(0, 20, 0, 29)),
    decan(Suit::Swords, 6, DayWindow::new(0, 30, 1, 8)),
    decan(Suit::Swords, 7, DayWindow::new(1, 9, 1, 18)),
    decan(Suit::Swords, 8, DayWindow::new(4, 21, 4, 31)),
    decan(Suit::Swords, 9, DayWindow::new(5, 1, 5, 10)),
    decan(Suit::Swords, 10, DayWindow::new(5, 11, 5, 20)),
    decan(Suit::Pentacles, 2, DayWindow::new(11, 22, 0, 1)),
    decan(Suit::Pentacles, 3, DayWindow::new(0, 2, 0, 10)),
    decan(Suit::Pentacles, 4, DayWindow::new(0, 11, 0, 19)),
    decan(Suit::Pentacles, 5, DayWindow::new(3, 21, 3, 30)),
    decan(Suit::Pentacles, 6, DayWindow::new(4, 1, 4, 10)),
    decan(Suit::Pentacles, 7, DayWindow::new(4, 11, 4, 20)),
    decan(Suit::Pentacles, 8, DayWindow::new(7, 23, 8, 1)),
    decan(Suit::Pentacles, 9, DayWindow::new(8, 2, 8, 11)),
    decan(Suit::Pentacles, 10, DayWindow::new(8, 12, 8, 22)),
];

/// Major card per sign, indexed by `ZodiacSign::index()`.
pub const SIGN_CARDS: [&str; 12] = [
    "The Emperor",
    "The Hierophant",
    "The Lovers",
    "The Chariot",
    "Strength",
    "The Hermit",
    "Justice",
    "Death",
    "Temperance",
    "The Devil",
    "The Star",
    "The Moon",
];

/// Major card per body, indexed by `Body::index()`.
pub const BODY_CARDS: [&str; 10] = [
    "The Sun",
    "The High Priestess",
    "The Magician",
    "The Empress",
    "The Tower",
    "Wheel of Fortune",
    "The World",
    "The Fool",
    "The Hanged Man",
    "Judgement",
];

/// Keywords per sign, indexed by `ZodiacSign::index()`.
pub const SIGN_KEYWORDS: [&[&str]; 12] = [
    &["initiative", "courage", "spice"],
    &["stability", "sensuality", "richness"],
    &["curiosity", "variety", "lightness"],
    &["nurture", "comfort", "home"],
    &["warmth", "generosity", "celebration"],
    &["precision", "health", "simplicity"],
    &["balance", "harmony", "elegance"],
    &["intensity", "depth", "transformation"],
    &["adventure", "abundance", "exploration"],
    &["discipline", "tradition", "structure"],
    &["innovation", "community", "experiment"],
    &["intuition", "flow", "compassion"],
];

/// The complete table set consumed by the calculator.
#[derive(Debug, Clone)]
pub struct AlignmentTables {
    pub weekday_rulers: [Body; 7],
    pub hour_rulers: [Body; HOUR_COUNT],
    pub zodiac_ranges: [(ZodiacSign, DayWindow); 12],
    pub decans: [DecanWindow; 36],
    pub sign_cards: [&'static str; 12],
    pub body_cards: [&'static str; 10],
    pub sign_keywords: [&'static [&'static str]; 12],
    /// Rows follow `ALL_CHAKRAS`; columns are fire, water, earth, air,
    /// spirit, essence, matter, substance.
    pub chakra_weights: [[f64; 8]; 7],
}

impl Default for AlignmentTables {
    fn default() -> Self {
        Self {
            weekday_rulers: WEEKDAY_RULERS,
            hour_rulers: HOUR_RULERS,
            zodiac_ranges: ZODIAC_RANGES,
            decans: DECANS,
            sign_cards: SIGN_CARDS,
            body_cards: BODY_CARDS,
            sign_keywords: SIGN_KEYWORDS,
            chakra_weights: crate::chakra::CHAKRA_WEIGHTS,
        }
    }
}

impl AlignmentTables {
    /// Sign whose calendar range covers `(month0, day)`.
    pub fn zodiac_sign(&self, month0: u32, day: u32) -> Result<ZodiacSign, AlignmentError> {
        self.zodiac_ranges
            .iter()
            .find(|(_, w)| w.contains(month0, day))
            .map(|(sign, _)| *sign)
            .ok_or(AlignmentError::ZodiacTableMiss { month0, day })
    }

    pub fn decan(&self, month0: u32, day: u32) -> Option<&DecanWindow> {
        self.decans.iter().find(|d| d.window.contains(month0, day))
    }

    /// Weekday ruler, Sunday = 0. Out-of-range input wraps.
    pub fn weekday_ruler(&self, weekday: u32) -> Body {
        self.weekday_rulers[weekday as usize % self.weekday_rulers.len()]
    }

    pub fn hour_ruler(&self, hour: u32) -> Body {
        self.hour_rulers[hour as usize % HOUR_COUNT]
    }

    pub fn sign_card(&self, sign: ZodiacSign) -> &'static str {
        self.sign_cards[sign.index() as usize]
    }

    pub fn body_card(&self, body: Body) -> &'static str {
        self.body_cards[body.index()]
    }

    pub fn sign_keywords(&self, sign: ZodiacSign) -> &'static [&'static str] {
        self.sign_keywords[sign.index() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alchm_time::CalendarParts;

    const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    fn every_day() -> impl Iterator<Item = MonthDay> {
        (0..12u32).flat_map(|m| (1..=DAYS_IN_MONTH[m as usize]).map(move |d| (m, d)))
    }

    #[test]
    fn zodiac_ranges_cover_year_once() {
        for (m, d) in every_day() {
            assert!(CalendarParts::validate_month_day(m, d).is_ok());
            let hits = ZODIAC_RANGES.iter().filter(|(_, w)| w.contains(m, d)).count();
            assert_eq!(hits, 1, "month0={m} day={d}");
        }
    }

    #[test]
    fn decans_cover_year_once() {
        for (m, d) in every_day() {
            let hits = DECANS.iter().filter(|w| w.window.contains(m, d)).count();
            assert_eq!(hits, 1, "month0={m} day={d}");
        }
    }

    #[test]
    fn decans_nine_per_suit() {
        for suit in ALL_SUITS {
            let ranks: Vec<u8> = DECANS
                .iter()
                .filter(|w| w.card.suit == suit)
                .map(|w| w.card.rank)
                .collect();
            assert_eq!(ranks, (2..=10).collect::<Vec<u8>>());
        }
    }

    #[test]
    fn exactly_one_decan_wraps_year() {
        let wrapping: Vec<_> = DECANS.iter().filter(|w| w.window.wraps_year()).collect();
        assert_eq!(wrapping.len(), 1);
        assert_eq!(wrapping[0].card, MinorCard::new(Suit::Pentacles, 2));
        assert_eq!(wrapping[0].window, DayWindow::new(11, 22, 0, 1));
    }

    #[test]
    fn hour_rulers_follow_chaldean_cycle() {
        assert_eq!(HOUR_RULERS[0], Body::Sun);
        assert_eq!(HOUR_RULERS[1], Body::Venus);
        assert_eq!(HOUR_RULERS[7], Body::Sun);
        // 24 hours later the cycle lands on Monday's ruler.
        assert_eq!(CHALDEAN_FROM_SUN[HOUR_COUNT % 7], Body::Moon);
    }

    #[test]
    fn zodiac_boundaries() {
        let t = AlignmentTables::default();
        assert_eq!(t.zodiac_sign(2, 21), Ok(ZodiacSign::Aries));
        assert_eq!(t.zodiac_sign(2, 19), Ok(ZodiacSign::Pisces));
        assert_eq!(t.zodiac_sign(0, 1), Ok(ZodiacSign::Capricorn));
        assert_eq!(t.zodiac_sign(11, 31), Ok(ZodiacSign::Capricorn));
        assert!(t.zodiac_sign(12, 1).is_err());
    }

    #[test]
    fn card_names() {
        assert_eq!(MinorCard::new(Suit::Cups, 10).to_string(), "Ten of Cups");
        let t = AlignmentTables::default();
        assert_eq!(t.sign_card(ZodiacSign::Leo), "Strength");
        assert_eq!(t.body_card(Body::Mercury), "The Magician");
    }
}
