//! Role-based access control as a closed permission table.
//!
//! Each protected operation is an `Operation` variant; `Role::allows` is the
//! single decision point from (role, operation) to allow/deny. Handlers that
//! need row-level scoping (a salesperson seeing only their own assignments)
//! apply it on top of this table.

use crate::database::models::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    UserCreate,
    UserList,
    UserUpdate,
    UserDelete,
    LeadCreate,
    LeadList,
    LeadUpdate,
    LeadDelete,
    LocationReport,
    SalespersonList,
    SalespersonNearby,
    AssignmentCreate,
    AssignmentList,
    AssignmentUpdate,
    ReportView,
}

impl Role {
    pub fn allows(&self, operation: Operation) -> bool {
        use Operation::*;
        use Role::*;

        match operation {
            UserCreate => matches!(self, Admin | Hr),
            UserList | UserUpdate | UserDelete => matches!(self, Admin),

            LeadCreate | LeadUpdate => matches!(self, Admin | Crm),
            LeadList => true,
            LeadDelete => matches!(self, Admin),

            LocationReport => matches!(self, Salesperson),
            SalespersonList | SalespersonNearby => true,

            AssignmentCreate => matches!(self, Admin | Crm),
            AssignmentList => true,
            // The assigned salesperson may progress their own assignment;
            // the ownership check lives in the handler.
            AssignmentUpdate => matches!(self, Admin | Crm | Salesperson),

            ReportView => matches!(self, Admin | Executive | Crm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 5] = [
        Role::Admin,
        Role::Executive,
        Role::Crm,
        Role::Hr,
        Role::Salesperson,
    ];

    #[test]
    fn admin_is_the_only_user_manager() {
        for role in ALL_ROLES {
            assert_eq!(role.allows(Operation::UserList), role == Role::Admin);
            assert_eq!(role.allows(Operation::UserUpdate), role == Role::Admin);
            assert_eq!(role.allows(Operation::UserDelete), role == Role::Admin);
        }
    }

    #[test]
    fn user_creation_is_admin_or_hr() {
        assert!(Role::Admin.allows(Operation::UserCreate));
        assert!(Role::Hr.allows(Operation::UserCreate));
        assert!(!Role::Crm.allows(Operation::UserCreate));
        assert!(!Role::Executive.allows(Operation::UserCreate));
        assert!(!Role::Salesperson.allows(Operation::UserCreate));
    }

    #[test]
    fn leads_are_managed_by_crm_and_admin() {
        assert!(Role::Crm.allows(Operation::LeadCreate));
        assert!(Role::Admin.allows(Operation::LeadCreate));
        assert!(!Role::Salesperson.allows(Operation::LeadCreate));
        assert!(!Role::Hr.allows(Operation::LeadUpdate));
        assert!(!Role::Crm.allows(Operation::LeadDelete));
        assert!(Role::Admin.allows(Operation::LeadDelete));
    }

    #[test]
    fn only_salespersons_report_location() {
        for role in ALL_ROLES {
            assert_eq!(
                role.allows(Operation::LocationReport),
                role == Role::Salesperson
            );
        }
    }

    #[test]
    fn assignment_creation_excludes_salespersons() {
        assert!(Role::Admin.allows(Operation::AssignmentCreate));
        assert!(Role::Crm.allows(Operation::AssignmentCreate));
        assert!(!Role::Salesperson.allows(Operation::AssignmentCreate));
        assert!(!Role::Hr.allows(Operation::AssignmentCreate));
    }

    #[test]
    fn reports_are_for_management_roles() {
        assert!(Role::Admin.allows(Operation::ReportView));
        assert!(Role::Executive.allows(Operation::ReportView));
        assert!(Role::Crm.allows(Operation::ReportView));
        assert!(!Role::Hr.allows(Operation::ReportView));
        assert!(!Role::Salesperson.allows(Operation::ReportView));
    }
}
