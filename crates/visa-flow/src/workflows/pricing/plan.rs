use serde::{Deserialize, Serialize};

/// Applicant-profile discount eligibility class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountCategory {
    #[default]
    Standard,
    Couple,
    Reference,
    Group,
    Skilled,
    Custom,
}

impl DiscountCategory {
    pub const ALL: [DiscountCategory; 6] = [
        DiscountCategory::Standard,
        DiscountCategory::Couple,
        DiscountCategory::Reference,
        DiscountCategory::Group,
        DiscountCategory::Skilled,
        DiscountCategory::Custom,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            DiscountCategory::Standard => "Standard",
            DiscountCategory::Couple => "Couple",
            DiscountCategory::Reference => "Reference",
            DiscountCategory::Group => "Group",
            DiscountCategory::Skilled => "Skilled",
            DiscountCategory::Custom => "Custom",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
    }
}

/// One slice of a plan's split structure, as a fraction of the taxed total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitSlice {
    pub label: &'static str,
    pub fraction: f64,
}

const FULL_PAYMENT_SPLITS: [SplitSlice; 1] = [SplitSlice {
    label: "Full Payment",
    fraction: 1.0,
}];

const TWO_PART_SPLITS: [SplitSlice; 2] = [
    SplitSlice {
        label: "Entry Payment (50%)",
        fraction: 0.50,
    },
    SplitSlice {
        label: "2nd Installment (50%)",
        fraction: 0.50,
    },
];

const THREE_PART_SPLITS: [SplitSlice; 3] = [
    SplitSlice {
        label: "Entry Payment (30%)",
        fraction: 0.30,
    },
    SplitSlice {
        label: "2nd Installment (40%)",
        fraction: 0.40,
    },
    SplitSlice {
        label: "3rd Installment (30%)",
        fraction: 0.30,
    },
];

const FOUR_PART_SPLITS: [SplitSlice; 4] = [
    SplitSlice {
        label: "Entry Payment (30%)",
        fraction: 0.30,
    },
    SplitSlice {
        label: "2nd Installment (30%)",
        fraction: 0.30,
    },
    SplitSlice {
        label: "3rd Installment (20%)",
        fraction: 0.20,
    },
    SplitSlice {
        label: "4th Installment (20%)",
        fraction: 0.20,
    },
];

/// Payment-splitting option offered for every destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    FullPayment,
    TwoPart,
    ThreePart,
    FourPart,
}

impl PlanTier {
    pub const ALL: [PlanTier; 4] = [
        PlanTier::FullPayment,
        PlanTier::TwoPart,
        PlanTier::ThreePart,
        PlanTier::FourPart,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PlanTier::FullPayment => "Full Payment",
            PlanTier::TwoPart => "2-Part Split",
            PlanTier::ThreePart => "3-Part Split",
            PlanTier::FourPart => "4-Part Split",
        }
    }

    /// Discount or surcharge applied to the discounted base price.
    pub const fn multiplier(self) -> f64 {
        match self {
            PlanTier::FullPayment => 0.90,
            PlanTier::TwoPart => 1.10,
            PlanTier::ThreePart => 1.15,
            PlanTier::FourPart => 1.20,
        }
    }

    /// Full split structure, entry slice first. Fractions sum to 1.0.
    pub const fn splits(self) -> &'static [SplitSlice] {
        match self {
            PlanTier::FullPayment => &FULL_PAYMENT_SPLITS,
            PlanTier::TwoPart => &TWO_PART_SPLITS,
            PlanTier::ThreePart => &THREE_PART_SPLITS,
            PlanTier::FourPart => &FOUR_PART_SPLITS,
        }
    }

    pub fn entry_fraction(self) -> f64 {
        self.splits()[0].fraction
    }

    /// Slices paid after the entry payment.
    pub fn post_entry_splits(self) -> &'static [SplitSlice] {
        &self.splits()[1..]
    }

    pub const fn is_split(self) -> bool {
        !matches!(self, PlanTier::FullPayment)
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL.into_iter().find(|tier| {
            tier.label().eq_ignore_ascii_case(trimmed)
                || tier.slug().eq_ignore_ascii_case(trimmed)
        })
    }

    const fn slug(self) -> &'static str {
        match self {
            PlanTier::FullPayment => "full_payment",
            PlanTier::TwoPart => "two_part",
            PlanTier::ThreePart => "three_part",
            PlanTier::FourPart => "four_part",
        }
    }
}
