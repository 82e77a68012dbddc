//! Built-in library of common tenancy clauses offered alongside free-text entry.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClauseCategory {
    pub name: &'static str,
    pub clauses: &'static [&'static str],
}

pub const CLAUSE_LIBRARY: &[ClauseCategory] = &[
    ClauseCategory {
        name: "Restrictions & Rules",
        clauses: &[
            "The Tenant shall not keep any pets (dogs, cats, or other animals) on the premises.",
            "No loud music or noise that disturbs other neighbors is permitted after 10 PM.",
            "Smoking is strictly prohibited inside the rooms or indoor common areas.",
            "The Tenant shall not conduct any religious services or commercial business on the premises.",
        ],
    },
    ClauseCategory {
        name: "Maintenance & Repairs",
        clauses: &[
            "The Tenant is responsible for the repair/replacement of all electrical bulbs, switches, and sockets damaged during the tenancy.",
            "The Tenant shall maintain the garden/compound and keep it tidy at all times.",
            "Any blockage of drains or sewage caused by the Tenant's negligence shall be cleared at the Tenant's cost.",
            "The Tenant shall replace any broken window panes or glass caused by their actions.",
        ],
    },
    ClauseCategory {
        name: "Utilities & Bills",
        clauses: &[
            "The Tenant agrees to pay a fixed monthly service fee of GH₵ 100 for water and sanitation.",
            "Electricity is shared; the Tenant shall pay 50% of the total monthly bill presented by the Landlord.",
            "The Tenant is responsible for purchasing their own prepaid electricity credits for their separate meter.",
            "The Tenant shall pay for waste collection services directly to the service provider.",
        ],
    },
    ClauseCategory {
        name: "Termination & Security",
        clauses: &[
            "The Landlord reserves the right to inspect the premises with 24 hours prior notice to the Tenant.",
            "The Tenant must return all keys to the Landlord immediately upon vacating the premises.",
            "The Tenant is responsible for the security of their own personal belongings; the Landlord is not liable for theft.",
        ],
    },
];

pub fn clause_library() -> &'static [ClauseCategory] {
    CLAUSE_LIBRARY
}

/// Appends `clause` unless an identical clause (after trimming) is already selected.
/// Returns whether the list changed.
pub fn add_clause(selected: &mut Vec<String>, clause: &str) -> bool {
    let clause = clause.trim();
    if clause.is_empty() || selected.iter().any(|existing| existing.trim() == clause) {
        return false;
    }
    selected.push(clause.to_string());
    true
}
