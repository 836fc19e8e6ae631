pub mod export;
pub mod formatting;
pub mod report;
pub mod sources;

/// One fund as it will appear in the generated preset list.
#[derive(Debug, Clone, PartialEq)]
pub struct FundPreset {
    pub fund_name: String,
    pub vintage: i32,
    pub size: FundSize,
    pub multiple: f64,
    pub irr: Option<f64>,
}

impl FundPreset {
    pub fn display_name(&self) -> String {
        format!(
            "{} ({}) - {:.2}x",
            self.fund_name, self.vintage, self.multiple
        )
    }
}

/// Fund size in millions of dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FundSize {
    /// Taken from the disclosure itself (committed capital).
    Reported(f64),
    /// Extrapolated from the pension's own commitment, also in millions.
    Estimated { millions: f64, commitment: f64 },
}

impl FundSize {
    pub const fn millions(self) -> f64 {
        match self {
            Self::Reported(millions) | Self::Estimated { millions, .. } => millions,
        }
    }

    pub const fn commitment(self) -> Option<f64> {
        match self {
            Self::Reported(_) => None,
            Self::Estimated { commitment, .. } => Some(commitment),
        }
    }
}
