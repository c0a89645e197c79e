//! Role ids seeded by the initial migration and what each of them may do.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Student,
    Cdc,
    Company,
    Dosen,
    Prodi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Sees postings under review and posts without a company binding.
    ReviewJobs,
    GradeAsCompany,
    /// Supervising lecturer, or examiner when assigned as one.
    GradeAsSupervisor,
    GradeAsProdi,
}

const ROLES: [(i64, Role, &str); 6] = [
    (1, Role::Superadmin, "superadmin"),
    (2, Role::Student, "student"),
    (3, Role::Cdc, "cdc"),
    (4, Role::Company, "company"),
    (5, Role::Dosen, "dosen"),
    (6, Role::Prodi, "prodi"),
];

const POLICY: &[(Role, Capability)] = &[
    (Role::Superadmin, Capability::ReviewJobs),
    (Role::Cdc, Capability::ReviewJobs),
    (Role::Company, Capability::GradeAsCompany),
    (Role::Dosen, Capability::GradeAsSupervisor),
    (Role::Prodi, Capability::GradeAsProdi),
];

impl Role {
    pub fn from_id(id: i64) -> Option<Role> {
        ROLES.iter().find(|(rid, _, _)| *rid == id).map(|(_, role, _)| *role)
    }

    pub fn id(&self) -> i64 {
        ROLES
            .iter()
            .find(|(_, role, _)| role == self)
            .map(|(id, _, _)| *id)
            .unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        ROLES
            .iter()
            .find(|(_, role, _)| role == self)
            .map(|(_, _, name)| *name)
            .unwrap_or_default()
    }

    /// Role requested at registration. `mitra` is the partner alias of company;
    /// anything unknown registers as a student.
    pub fn for_registration(requested: Option<&str>) -> Role {
        match requested.map(|r| r.trim().to_lowercase()).as_deref() {
            Some("cdc") => Role::Cdc,
            Some("company") | Some("mitra") => Role::Company,
            _ => Role::Student,
        }
    }

    /// Registrations that also create a company profile.
    pub fn owns_company(requested: Option<&str>) -> bool {
        matches!(
            requested.map(|r| r.trim().to_lowercase()).as_deref(),
            Some("cdc") | Some("company") | Some("mitra")
        )
    }

    pub fn can(&self, capability: Capability) -> bool {
        POLICY
            .iter()
            .any(|(role, cap)| role == self && *cap == capability)
    }
}

pub fn roles_of(role_ids: &[i64]) -> Vec<Role> {
    role_ids.iter().filter_map(|id| Role::from_id(*id)).collect()
}

pub fn any_can(role_ids: &[i64], capability: Capability) -> bool {
    roles_of(role_ids).iter().any(|role| role.can(capability))
}

/// Evaluation or report columns a signer writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Company,
    Lecturer,
    Examiner,
    Prodi,
}

impl Slot {
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Slot::Company => "company",
            Slot::Lecturer => "lecturer",
            Slot::Examiner => "examiner",
            Slot::Prodi => "prodi",
        }
    }

    /// Evaluation column holding the grader's user id.
    pub fn grader_column(&self) -> &'static str {
        match self {
            Slot::Company => "company_personnel_id",
            Slot::Lecturer => "lecturer_id",
            Slot::Examiner => "examiner_id",
            Slot::Prodi => "prodi_id",
        }
    }
}

/// Slots a user fills when grading or signing off. A lecturer lands in the
/// examiner slot only when acting as the examiner.
pub fn signing_slots(role_ids: &[i64], as_examiner: bool) -> Vec<Slot> {
    let mut slots = Vec::new();
    for role in roles_of(role_ids) {
        let slot = if role.can(Capability::GradeAsCompany) {
            Slot::Company
        } else if role.can(Capability::GradeAsSupervisor) {
            if as_examiner { Slot::Examiner } else { Slot::Lecturer }
        } else if role.can(Capability::GradeAsProdi) {
            Slot::Prodi
        } else {
            continue;
        };
        if !slots.contains(&slot) {
            slots.push(slot);
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_the_table() {
        for (id, role, name) in ROLES {
            assert_eq!(Role::from_id(id), Some(role));
            assert_eq!(role.id(), id);
            assert_eq!(role.name(), name);
        }
        assert_eq!(Role::from_id(42), None);
    }

    #[test]
    fn registration_roles() {
        assert_eq!(Role::for_registration(None), Role::Student);
        assert_eq!(Role::for_registration(Some("mitra")), Role::Company);
        assert_eq!(Role::for_registration(Some("Company")), Role::Company);
        assert_eq!(Role::for_registration(Some("cdc")), Role::Cdc);
        assert_eq!(Role::for_registration(Some("superadmin")), Role::Student);
        assert!(Role::owns_company(Some("cdc")));
        assert!(!Role::owns_company(Some("student")));
    }

    #[test]
    fn only_admin_and_cdc_review_jobs() {
        assert!(any_can(&[1], Capability::ReviewJobs));
        assert!(any_can(&[2, 3], Capability::ReviewJobs));
        assert!(!any_can(&[2, 4, 5, 6], Capability::ReviewJobs));
        assert!(!any_can(&[], Capability::ReviewJobs));
    }

    #[test]
    fn lecturer_slot_depends_on_examiner_flag() {
        assert_eq!(signing_slots(&[5], false), vec![Slot::Lecturer]);
        assert_eq!(signing_slots(&[5], true), vec![Slot::Examiner]);
    }

    #[test]
    fn company_and_prodi_slots() {
        assert_eq!(signing_slots(&[4], true), vec![Slot::Company]);
        assert_eq!(signing_slots(&[6], false), vec![Slot::Prodi]);
        assert_eq!(signing_slots(&[4, 6], false), vec![Slot::Company, Slot::Prodi]);
    }

    #[test]
    fn non_graders_get_no_slot() {
        assert!(signing_slots(&[1, 2, 3], false).is_empty());
        assert!(signing_slots(&[99], false).is_empty());
    }
}
