//! Menu areas and the role → area permission table.

use std::fmt;

use crate::access::role::Role;
use crate::observability::metrics;

/// A functional area requested from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuChoice {
    TimeReporting,
    Accounting,
    ItHelpdesk,
    EngineeringDocuments,
    Exit,
}

impl MenuChoice {
    /// Areas in menu order.
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::TimeReporting,
        MenuChoice::Accounting,
        MenuChoice::ItHelpdesk,
        MenuChoice::EngineeringDocuments,
        MenuChoice::Exit,
    ];

    /// Number shown in the menu and used in `/menu_option` URLs.
    pub fn number(&self) -> u32 {
        match self {
            MenuChoice::TimeReporting => 1,
            MenuChoice::Accounting => 2,
            MenuChoice::ItHelpdesk => 3,
            MenuChoice::EngineeringDocuments => 4,
            MenuChoice::Exit => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::TimeReporting => "Time Reporting",
            MenuChoice::Accounting => "Accounting",
            MenuChoice::ItHelpdesk => "IT Helpdesk",
            MenuChoice::EngineeringDocuments => "Engineering Documents",
            MenuChoice::Exit => "Exit",
        }
    }

    /// Content returned once access has been granted.
    pub fn content(&self) -> &'static str {
        match self {
            MenuChoice::TimeReporting => "You accessed the Time Reporting area",
            MenuChoice::Accounting => "You accessed the Accounting area",
            MenuChoice::ItHelpdesk => "You accessed the IT Helpdesk area",
            MenuChoice::EngineeringDocuments => "You accessed the Engineering Documents area!",
            MenuChoice::Exit => "Exiting the system",
        }
    }
}

/// Any number outside 1..=4 means Exit.
impl From<u32> for MenuChoice {
    fn from(n: u32) -> Self {
        match n {
            1 => MenuChoice::TimeReporting,
            2 => MenuChoice::Accounting,
            3 => MenuChoice::ItHelpdesk,
            4 => MenuChoice::EngineeringDocuments,
            _ => MenuChoice::Exit,
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn permitted(role: Role, choice: MenuChoice) -> bool {
    use MenuChoice::*;
    match (role, choice) {
        (Role::Admin, _) => true,
        (Role::Accountant, EngineeringDocuments) => false,
        (Role::Accountant, _) => true,
        (Role::Engineer, Accounting) => false,
        (Role::Engineer, _) => true,
        (Role::Intern, Accounting | EngineeringDocuments) => false,
        (Role::Intern, _) => true,
    }
}

/// Decide whether `role` may open `choice`.
pub fn check_access(role: Role, choice: MenuChoice) -> bool {
    let allowed = permitted(role, choice);
    tracing::debug!(role = %role, choice = %choice, allowed, "Access decision");
    metrics::record_access_decision(role.as_str(), allowed);
    allowed
}

/// String-typed entry point. Unknown role names are denied.
pub fn check_access_by_name(role: &str, choice: u32) -> bool {
    match role.parse::<Role>() {
        Ok(role) => check_access(role, MenuChoice::from(choice)),
        Err(e) => {
            tracing::warn!(error = %e, choice, "Access denied for unrecognized role");
            metrics::record_access_decision("unknown", false);
            false
        }
    }
}

/// Menu areas `role` may open, in menu order.
pub fn available_choices(role: Role) -> Vec<MenuChoice> {
    MenuChoice::ALL
        .into_iter()
        .filter(|choice| permitted(role, *choice))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_table() {
        assert!(!check_access_by_name("intern", 2));
        assert!(check_access_by_name("intern", 1));
        assert!(check_access_by_name("admin", 4));
        assert!(!check_access_by_name("unknown_role", 1));
    }

    #[test]
    fn test_role_restrictions() {
        assert!(!check_access(Role::Accountant, MenuChoice::EngineeringDocuments));
        assert!(check_access(Role::Accountant, MenuChoice::Accounting));
        assert!(!check_access(Role::Engineer, MenuChoice::Accounting));
        assert!(check_access(Role::Engineer, MenuChoice::EngineeringDocuments));
        assert!(!check_access(Role::Intern, MenuChoice::EngineeringDocuments));
        assert!(check_access(Role::Intern, MenuChoice::ItHelpdesk));
    }

    #[test]
    fn test_everyone_may_exit() {
        for role in Role::ALL {
            assert!(check_access(role, MenuChoice::Exit));
            assert!(check_access(role, MenuChoice::from(0)));
            assert!(check_access(role, MenuChoice::from(99)));
        }
    }

    #[test]
    fn test_unknown_role_denied_everywhere() {
        for n in 0..=6 {
            assert!(!check_access_by_name("Admin", n));
            assert!(!check_access_by_name("", n));
        }
    }

    #[test]
    fn test_available_choices() {
        assert_eq!(available_choices(Role::Admin).len(), 5);
        assert_eq!(
            available_choices(Role::Intern),
            vec![MenuChoice::TimeReporting, MenuChoice::ItHelpdesk, MenuChoice::Exit]
        );
        assert!(!available_choices(Role::Engineer).contains(&MenuChoice::Accounting));
        assert!(!available_choices(Role::Accountant).contains(&MenuChoice::EngineeringDocuments));
    }

    #[test]
    fn test_choice_numbering() {
        for choice in MenuChoice::ALL {
            assert_eq!(MenuChoice::from(choice.number()), choice);
        }
    }
}
