//! Roles and the screens each role may use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Executive,
}

/// One data manager of the back-office.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Manager {
    Attendance,
    Schedule,
    Kpi,
    Recruitment,
    News,
    Expenses,
    Members,
    Calendar,
    Dashboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Role {
    /// Whether this role may open `manager` with the given access.
    ///
    /// Employees writing attendance or KPI progress are further limited to
    /// their own rows by the commands.
    pub fn allows(&self, manager: Manager, access: Access) -> bool {
        match self {
            Role::Executive => true,
            Role::Employee => match manager {
                Manager::Attendance | Manager::Kpi => true,
                Manager::Schedule | Manager::News | Manager::Calendar | Manager::Dashboard => access == Access::Read,
                Manager::Recruitment | Manager::Expenses | Manager::Members => false,
            },
        }
    }

    pub fn is_executive(&self) -> bool {
        matches!(self, Role::Executive)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Employee => write!(f, "employee"),
            Role::Executive => write!(f, "executive"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "executive" => Ok(Role::Executive),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Manager::Attendance => "attendance",
            Manager::Schedule => "schedule",
            Manager::Kpi => "kpi",
            Manager::Recruitment => "recruitment",
            Manager::News => "news",
            Manager::Expenses => "expenses",
            Manager::Members => "members",
            Manager::Calendar => "calendar",
            Manager::Dashboard => "dashboard",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_cannot_touch_executive_screens() {
        let role = Role::Employee;
        assert!(!role.allows(Manager::Recruitment, Access::Read));
        assert!(!role.allows(Manager::Expenses, Access::Read));
        assert!(!role.allows(Manager::Members, Access::Write));
        assert!(role.allows(Manager::News, Access::Read));
        assert!(!role.allows(Manager::News, Access::Write));
        assert!(role.allows(Manager::Attendance, Access::Write));
    }

    #[test]
    fn executive_can_do_everything() {
        for manager in [Manager::Recruitment, Manager::Expenses, Manager::Members, Manager::Schedule] {
            assert!(Role::Executive.allows(manager, Access::Write));
        }
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Executive".parse::<Role>().unwrap(), Role::Executive);
        assert!("manager".parse::<Role>().is_err());
    }
}
