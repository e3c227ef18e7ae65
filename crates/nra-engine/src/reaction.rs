//! Single-day price reaction around an anchor date.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use nra_calendar::EventKind;
use serde::{Serialize, Serializer};

use crate::index::PriceIndex;

// ---------------------------------------------------------------------------
// Pip size
// ---------------------------------------------------------------------------

/// Minimum meaningful price increment of an instrument. Always finite and > 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct PipSize(f64);

impl PipSize {
    /// Four-decimal FX majors (EUR/USD and friends).
    pub const FX_MAJOR: PipSize = PipSize(0.0001);
    /// Yen crosses.
    pub const FX_JPY: PipSize = PipSize(0.01);

    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    fn to_pips(self, price_delta: f64) -> f64 {
        price_delta / self.0
    }
}

impl Default for PipSize {
    fn default() -> Self {
        PipSize::FX_MAJOR
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// What a reaction record is attributed to: an announcement type, or the
/// synthetic control label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionLabel {
    Event(EventKind),
    NoNews,
}

impl ReactionLabel {
    pub const NO_NEWS: &'static str = "No News";

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionLabel::Event(kind) => kind.as_str(),
            ReactionLabel::NoNews => Self::NO_NEWS,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        if s.trim() == Self::NO_NEWS {
            return Some(ReactionLabel::NoNews);
        }
        EventKind::parse(s).map(ReactionLabel::Event)
    }
}

// Ordered by display string so grouped output reads alphabetically.
impl Ord for ReactionLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for ReactionLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ReactionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EventKind> for ReactionLabel {
    fn from(kind: EventKind) -> Self {
        ReactionLabel::Event(kind)
    }
}

impl Serialize for ReactionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Next-day reversal
// ---------------------------------------------------------------------------

/// Whether the following trading day's close erased the anchor day's move.
///
/// `Unknown` means there is no later bar; it is not the same as "did not
/// reverse".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NextDayReversal {
    Reversed,
    Held,
    Unknown,
}

impl NextDayReversal {
    pub fn is_known(&self) -> bool {
        !matches!(self, NextDayReversal::Unknown)
    }

    pub fn as_option(&self) -> Option<bool> {
        match self {
            NextDayReversal::Reversed => Some(true),
            NextDayReversal::Held => Some(false),
            NextDayReversal::Unknown => None,
        }
    }
}

impl From<bool> for NextDayReversal {
    fn from(reversed: bool) -> Self {
        if reversed {
            NextDayReversal::Reversed
        } else {
            NextDayReversal::Held
        }
    }
}

/// Serialized as `true` / `false` / `null`.
impl Serialize for NextDayReversal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Reaction of one anchor day. `movement_pips` and `range_pips` are never
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReactionRecord {
    pub date: NaiveDate,
    pub label: ReactionLabel,
    /// Prior trading day's close.
    pub price_before: f64,
    /// Anchor day's close.
    pub price_after: f64,
    pub movement_pips: f64,
    pub range_pips: f64,
    pub next_day_reversal: NextDayReversal,
    pub same_day_reversal: bool,
}

/// Compute the reaction on `anchor`.
///
/// Returns `None` when there is no bar before `anchor` or `anchor` itself is
/// not a trading day; such dates are dropped, never zero-filled.
pub fn compute_reaction(
    anchor: NaiveDate,
    label: ReactionLabel,
    index: &PriceIndex,
    pip: PipSize,
) -> Option<ReactionRecord> {
    let prior = index.bar_before(anchor)?;
    let today = index.bar_on(anchor)?;

    let price_before = prior.close;
    let price_after = today.close;
    let net_move = price_after - price_before;
    let direction = net_move.partial_cmp(&0.0).unwrap_or(Ordering::Equal);

    // A reversal needs the next close back through the prior close, not a
    // partial retracement.
    let next_day_reversal = match index.bar_after(anchor) {
        None => NextDayReversal::Unknown,
        Some(next) => match direction {
            Ordering::Greater => (next.close < price_before).into(),
            Ordering::Less => (next.close > price_before).into(),
            Ordering::Equal => NextDayReversal::Held,
        },
    };

    // Intraday give-back from the extreme exceeds the net move.
    let same_day_reversal = match direction {
        Ordering::Greater => (today.high - price_after) > net_move,
        Ordering::Less => (price_after - today.low) > net_move.abs(),
        Ordering::Equal => false,
    };

    Some(ReactionRecord {
        date: anchor,
        label,
        price_before,
        price_after,
        movement_pips: pip.to_pips(net_move.abs()),
        range_pips: pip.to_pips((today.high - today.low).max(0.0)),
        next_day_reversal,
        same_day_reversal,
    })
}
