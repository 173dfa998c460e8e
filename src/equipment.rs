use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A piece of lab equipment. `service_urgency` is the number of days until
/// the next service is due; zero means due today, negative means overdue.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    pub service_urgency: i64,
}

impl Equipment {
    pub fn new<S: Into<String>>(name: S, service_urgency: i64) -> Self {
        Self {
            name: name.into(),
            service_urgency,
        }
    }

    /// Smaller (or more negative) urgency sorts first: the equipment whose
    /// service is due soonest is the most urgent.
    pub fn cmp_by_service_due(&self, other: &Self) -> Ordering {
        self.service_urgency.cmp(&other.service_urgency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_by_service_due() {
        let overdue = Equipment::new("CENTRIFUGE", -3);
        let due_today = Equipment::new("INCUBATOR", 0);
        let later = Equipment::new("FREEZER", 20);
        assert_eq!(overdue.cmp_by_service_due(&due_today), Ordering::Less);
        assert_eq!(later.cmp_by_service_due(&due_today), Ordering::Greater);
        assert_eq!(due_today.cmp_by_service_due(&due_today), Ordering::Equal);
    }
}
