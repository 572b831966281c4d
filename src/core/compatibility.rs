use crate::models::{BloodGroup, Compatibility};

use BloodGroup::*;

/// Fixed donor → recipient mapping for red cell transfusion.
///
/// Entries are indexed by the donor's position in [`BloodGroup::ALL`].
#[derive(Debug)]
pub struct CompatibilityTable {
    recipients: [&'static [BloodGroup]; 8],
}

/// The standard ABO/Rh table
pub static STANDARD_TABLE: CompatibilityTable = CompatibilityTable {
    recipients: [
        &[ONeg, OPos, ANeg, APos, BNeg, BPos, AbNeg, AbPos],
        &[OPos, APos, BPos, AbPos],
        &[ANeg, APos, AbNeg, AbPos],
        &[APos, AbPos],
        &[BNeg, BPos, AbNeg, AbPos],
        &[BPos, AbPos],
        &[AbNeg, AbPos],
        &[AbPos],
    ],
};

impl CompatibilityTable {
    /// Groups that can receive from `donor`
    #[inline]
    pub fn recipients(&self, donor: BloodGroup) -> &'static [BloodGroup] {
        self.recipients[donor as usize]
    }

    /// A donor whose list covers every group
    #[inline]
    pub fn is_universal(&self, donor: BloodGroup) -> bool {
        self.recipients(donor).len() == BloodGroup::ALL.len()
    }

    /// Compatibility for a raw group string; unknown input yields an empty set
    pub fn resolve(&self, blood_group: &str) -> Compatibility {
        match blood_group.parse::<BloodGroup>() {
            Ok(group) => self.resolve_group(group),
            Err(_) => Compatibility {
                blood_group: blood_group.to_string(),
                can_donate_to: Vec::new(),
                is_universal: false,
            },
        }
    }

    pub fn resolve_group(&self, group: BloodGroup) -> Compatibility {
        Compatibility {
            blood_group: group.as_str().to_string(),
            can_donate_to: self.recipients(group).to_vec(),
            is_universal: self.is_universal(group),
        }
    }
}

/// Resolve against the standard table
pub fn compatible_recipients(blood_group: &str) -> Compatibility {
    STANDARD_TABLE.resolve(blood_group)
}

impl Compatibility {
    pub fn for_group(group: BloodGroup) -> Self {
        STANDARD_TABLE.resolve_group(group)
    }

    /// Whether a need asking for `required` blood is relevant to this donor.
    ///
    /// Group-agnostic needs (no or blank required group) match everyone, and a
    /// universal donor matches everything.
    pub fn admits(&self, required: Option<&str>) -> bool {
        if self.is_universal {
            return true;
        }

        let required = match required.map(str::trim) {
            None | Some("") => return true,
            Some(r) => r,
        };

        required
            .parse::<BloodGroup>()
            .map(|group| self.can_donate_to.contains(&group))
            .unwrap_or(false)
    }
}
