//! The fixed set of macroeconomic announcement types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Announcement type. Display strings are the labels used in every CSV and
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    Cpi,
    NonFarmPayrolls,
    UnemploymentRate,
    CrudeOilInventories,
    IsmManufacturingPmi,
    IsmNonManufacturingPmi,
    DurableGoodsOrders,
    InitialJoblessClaims,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::Cpi,
        EventKind::NonFarmPayrolls,
        EventKind::UnemploymentRate,
        EventKind::CrudeOilInventories,
        EventKind::IsmManufacturingPmi,
        EventKind::IsmNonManufacturingPmi,
        EventKind::DurableGoodsOrders,
        EventKind::InitialJoblessClaims,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Cpi => "CPI (YoY)",
            EventKind::NonFarmPayrolls => "Non-Farm Payrolls (NFP)",
            EventKind::UnemploymentRate => "Unemployment Rate",
            EventKind::CrudeOilInventories => "Crude Oil Inventories",
            EventKind::IsmManufacturingPmi => "ISM Manufacturing PMI",
            EventKind::IsmNonManufacturingPmi => "ISM Non-Manufacturing PMI",
            EventKind::DurableGoodsOrders => "Durable Goods Orders MoM",
            EventKind::InitialJoblessClaims => "Initial Jobless Claims",
        }
    }

    /// Short CLI-friendly code.
    pub fn code(&self) -> &'static str {
        match self {
            EventKind::Cpi => "cpi",
            EventKind::NonFarmPayrolls => "nfp",
            EventKind::UnemploymentRate => "unemployment",
            EventKind::CrudeOilInventories => "crude",
            EventKind::IsmManufacturingPmi => "ism-mfg",
            EventKind::IsmNonManufacturingPmi => "ism-services",
            EventKind::DurableGoodsOrders => "durables",
            EventKind::InitialJoblessClaims => "claims",
        }
    }

    /// Typical US Eastern release time. Advisory only.
    pub fn typical_release_time(&self) -> NaiveTime {
        let (h, m) = match self {
            EventKind::CrudeOilInventories => (10, 30),
            EventKind::IsmManufacturingPmi | EventKind::IsmNonManufacturingPmi => (10, 0),
            _ => (8, 30),
        };
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Exact display label, or a short code (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        EventKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s || k.code().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::parse(s).ok_or_else(|| format!("unknown event label '{}'", s.trim()))
    }
}
