use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A biological sample on the dashboard. The patient name doubles as the
/// lookup key for the sample↔test relation; ids are not required to be
/// unique.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sample {
    pub name: String,
    pub id: i64,
    #[serde(default)]
    pub requested_tests: Vec<String>,
}

impl Sample {
    pub fn new<S: Into<String>>(name: S, id: i64) -> Self {
        Self {
            name: name.into(),
            id,
            requested_tests: vec![],
        }
    }

    /// Records a test request by name. Names already present are skipped,
    /// so `requested_tests` never holds duplicates. Returns whether the
    /// name was appended.
    pub fn request_test(&mut self, test_name: &str) -> bool {
        if self.requested_tests.iter().any(|t| t == test_name) {
            return false;
        }
        self.requested_tests.push(test_name.to_string());
        true
    }

    /// Removes every occurrence of the test name from this sample.
    pub fn withdraw_test(&mut self, test_name: &str) {
        self.requested_tests.retain(|t| t != test_name);
    }

    pub fn cmp_by_id(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_test_skips_duplicates() {
        let mut sample = Sample::new("JANE DOE", 3456);
        assert!(sample.request_test("HCV"));
        assert!(!sample.request_test("HCV"));
        assert_eq!(sample.requested_tests, vec!["HCV".to_string()]);
    }

    #[test]
    fn test_withdraw_test() {
        let mut sample = Sample::new("JANE DOE", 3456);
        sample.request_test("HCV");
        sample.request_test("HTLV");
        sample.withdraw_test("HCV");
        assert_eq!(sample.requested_tests, vec!["HTLV".to_string()]);
    }

    #[test]
    fn test_cmp_by_id() {
        let a = Sample::new("JANE DOE", 3456);
        let b = Sample::new("JOHN DOE", 1256);
        assert_eq!(a.cmp_by_id(&b), Ordering::Greater);
        assert_eq!(b.cmp_by_id(&a), Ordering::Less);
        assert_eq!(a.cmp_by_id(&a), Ordering::Equal);
    }
}
