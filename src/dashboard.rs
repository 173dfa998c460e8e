use crate::{
    equipment::Equipment,
    error::{EngineError, ErrorCode},
    lab_test::{LabTest, TestPriority},
    sample::Sample,
};
use serde::{Deserialize, Serialize};

/// The dashboard owns the three catalogs and mediates every mutation of
/// them, keeping the sample↔test relation consistent on both sides.
///
/// Between any two operations:
/// - every name in a sample's `requested_tests` names a test in the test
///   catalog, and symmetrically for a test's `required_by`;
/// - a related (sample, test) pair is recorded on both sides;
/// - catalog indices are 0-based and contiguous.
///
/// All operations are synchronous and either complete fully or fail before
/// any state change. The only surfaced failure is an out-of-range index on
/// the `delete_*` operations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dashboard {
    samples: Vec<Sample>,
    tests: Vec<LabTest>,
    equipment: Vec<Equipment>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sample(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn add_test(&mut self, test: LabTest) {
        self.tests.push(test);
    }

    pub fn add_equipment(&mut self, equipment: Equipment) {
        self.equipment.push(equipment);
    }

    /// Deletes the sample at `index` and removes its name from every
    /// test's `required_by`. The cross-cleanup runs before the removal so
    /// the name is still addressable.
    pub fn delete_sample(&mut self, index: usize) -> Result<Sample, EngineError> {
        if index >= self.samples.len() {
            return Err(EngineError {
                code: ErrorCode::IndexOutOfRange,
                message: format!(
                    "Invalid sample index {index}, catalog holds {}",
                    self.samples.len()
                ),
            });
        }
        let name = self.samples[index].name.clone();
        for test in &mut self.tests {
            test.remove_required_by(&name);
        }
        tracing::debug!(sample = %name, index, "deleted sample");
        Ok(self.samples.remove(index))
    }

    /// Deletes the test at `index` and removes its name from every
    /// sample's `requested_tests`.
    pub fn delete_test(&mut self, index: usize) -> Result<LabTest, EngineError> {
        if index >= self.tests.len() {
            return Err(EngineError {
                code: ErrorCode::IndexOutOfRange,
                message: format!(
                    "Invalid test index {index}, catalog holds {}",
                    self.tests.len()
                ),
            });
        }
        let name = self.tests[index].name.clone();
        for sample in &mut self.samples {
            sample.withdraw_test(&name);
        }
        tracing::debug!(test = %name, index, "deleted test");
        Ok(self.tests.remove(index))
    }

    pub fn delete_equipment(&mut self, index: usize) -> Result<Equipment, EngineError> {
        if index >= self.equipment.len() {
            return Err(EngineError {
                code: ErrorCode::IndexOutOfRange,
                message: format!(
                    "Invalid equipment index {index}, catalog holds {}",
                    self.equipment.len()
                ),
            });
        }
        Ok(self.equipment.remove(index))
    }

    pub fn clear_samples(&mut self) {
        self.samples.clear();
        for test in &mut self.tests {
            test.required_by.clear();
        }
    }

    pub fn clear_tests(&mut self) {
        self.tests.clear();
        for sample in &mut self.samples {
            sample.requested_tests.clear();
        }
    }

    pub fn clear_equipment(&mut self) {
        self.equipment.clear();
    }

    /// Relates the first sample named `sample_name` to every test named
    /// `test_name`. The sample side is idempotent; the test side appends
    /// unconditionally, so repeated calls accumulate duplicate sample
    /// names in `required_by`. A silent no-op when nothing matches.
    pub fn add_test_to_sample(&mut self, sample_name: &str, test_name: &str) {
        let Some(sample) = self.samples.iter_mut().find(|s| s.name == sample_name) else {
            return;
        };
        for test in self.tests.iter_mut().filter(|t| t.name == test_name) {
            sample.request_test(&test.name);
            test.add_required_by(&sample.name);
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn tests(&self) -> &[LabTest] {
        &self.tests
    }

    pub fn equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn names_of_samples(&self) -> Vec<String> {
        self.samples.iter().map(|s| s.name.clone()).collect()
    }

    pub fn names_of_tests(&self) -> Vec<String> {
        self.tests.iter().map(|t| t.name.clone()).collect()
    }

    pub fn names_of_equipment(&self) -> Vec<String> {
        self.equipment.iter().map(|e| e.name.clone()).collect()
    }

    /// Test names requested on every sample named `sample_name`,
    /// concatenated in catalog order. Empty when nothing matches.
    pub fn tests_for_sample(&self, sample_name: &str) -> Vec<String> {
        self.samples
            .iter()
            .filter(|s| s.name == sample_name)
            .flat_map(|s| s.requested_tests.iter().cloned())
            .collect()
    }

    /// Sample names requiring every test named `test_name`, concatenated
    /// in catalog order. Empty when nothing matches.
    pub fn samples_for_test(&self, test_name: &str) -> Vec<String> {
        self.tests
            .iter()
            .filter(|t| t.name == test_name)
            .flat_map(|t| t.required_by.iter().cloned())
            .collect()
    }

    pub fn find_equipment(&self, equipment_name: &str) -> Option<&Equipment> {
        self.equipment.iter().find(|e| e.name == equipment_name)
    }

    /// Service urgency of the first equipment with a matching name, or 0
    /// when nothing matches. Callers that need to tell a miss apart from a
    /// legitimate "due today" should use [`Self::find_equipment`].
    pub fn equipment_info(&self, equipment_name: &str) -> i64 {
        self.find_equipment(equipment_name)
            .map(|e| e.service_urgency)
            .unwrap_or(0)
    }

    pub fn sort_samples_by_id(&mut self) {
        self.samples.sort_by(Sample::cmp_by_id);
    }

    pub fn sort_equipment_by_service_urgency(&mut self) {
        self.equipment.sort_by(Equipment::cmp_by_service_due);
    }

    pub fn sort_tests_by_priority(&mut self, priority: TestPriority) {
        match priority {
            TestPriority::Duration => self.tests.sort_by(LabTest::cmp_by_duration),
            TestPriority::NumberOfSamples => self.tests.sort_by(LabTest::cmp_by_sample_count),
        }
    }
}
