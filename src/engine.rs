use crate::{
    dashboard::Dashboard,
    demo::DemoRoster,
    equipment::Equipment,
    error::{EngineError, ErrorCode},
    lab_test::{LabTest, TestPriority},
    sample::Sample,
};
use itertools::iproduct;
use serde::{Deserialize, Serialize};

pub type OpId = String;
pub type RunId = String;

/// One dashboard mutation. Read-only projections (name lists, relation
/// views, equipment info) are served from [`Engine::snapshot`] instead.
///
/// Names arriving in `Add*` payloads are upper-cased before they reach the
/// catalogs; blank names are rejected. The `Delete*` batches expect indices
/// into the current catalog order, sorted ascending — the shift caused by
/// each removal is corrected here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    AddSample {
        name: String,
        id: i64,
    },
    AddTest {
        name: String,
        duration: u32,
    },
    AddEquipment {
        name: String,
        service_urgency: i64,
    },
    DeleteSamples {
        indices: Vec<usize>,
    },
    DeleteTests {
        indices: Vec<usize>,
    },
    DeleteEquipment {
        indices: Vec<usize>,
    },
    AddTestsToSamples {
        samples: Vec<String>,
        tests: Vec<String>,
    },
    SortSamplesById,
    SortTests {
        priority: TestPriority,
    },
    SortEquipmentByServiceUrgency,
    ClearSamples,
    ClearTests,
    ClearEquipment,
    Autogenerate,
    SetParameter {
        name: String,
        value: serde_json::Value,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub run_id: RunId,
    pub ops: Vec<Operation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpResult {
    pub op_id: OpId,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub warnings: Vec<String>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    pub run_id: RunId,
    pub op: Operation,
    pub result: OpResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParameters {
    pub autogenerate_seed: u64,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            autogenerate_seed: 0x9E3779B97F4A7C15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub protocol_version: String,
    pub supported_operations: Vec<String>,
    pub deterministic_operation_log: bool,
}

pub trait Engine {
    fn apply(&mut self, op: Operation) -> Result<OpResult, EngineError>;
    fn apply_workflow(&mut self, wf: Workflow) -> Result<Vec<OpResult>, EngineError>;
    fn snapshot(&self) -> &Dashboard;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabFlowEngine {
    dashboard: Dashboard,
    #[serde(default)]
    parameters: EngineParameters,
    journal: Vec<OperationRecord>,
    op_counter: u64,
}

impl LabFlowEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dashboard(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            ..Self::default()
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn parameters(&self) -> &EngineParameters {
        &self.parameters
    }

    pub fn capabilities() -> Capabilities {
        Capabilities {
            protocol_version: "v1".to_string(),
            supported_operations: vec![
                "AddSample".to_string(),
                "AddTest".to_string(),
                "AddEquipment".to_string(),
                "DeleteSamples".to_string(),
                "DeleteTests".to_string(),
                "DeleteEquipment".to_string(),
                "AddTestsToSamples".to_string(),
                "SortSamplesById".to_string(),
                "SortTests".to_string(),
                "SortEquipmentByServiceUrgency".to_string(),
                "ClearSamples".to_string(),
                "ClearTests".to_string(),
                "ClearEquipment".to_string(),
                "Autogenerate".to_string(),
                "SetParameter".to_string(),
            ],
            deterministic_operation_log: true,
        }
    }

    pub fn operation_log(&self) -> &[OperationRecord] {
        &self.journal
    }

    fn next_op_id(&mut self) -> OpId {
        self.op_counter += 1;
        format!("op-{}", self.op_counter)
    }

    /// Presentation-side input policy: names are upper-cased on entry and
    /// must not be blank.
    fn accept_name(name: &str, what: &str) -> Result<String, EngineError> {
        let name = name.to_uppercase();
        if name.is_empty() {
            return Err(EngineError {
                code: ErrorCode::InvalidInput,
                message: format!("A {what} needs a non-empty name"),
            });
        }
        Ok(name)
    }

    /// Corrects a caller-supplied index for the `count` removals already
    /// applied in this batch. Indices must arrive sorted ascending.
    fn shifted_index(index: usize, count: usize) -> Result<usize, EngineError> {
        index.checked_sub(count).ok_or_else(|| EngineError {
            code: ErrorCode::IndexOutOfRange,
            message: format!("Batch index {index} is not ascending (position {count})"),
        })
    }

    fn lcg_next(state: &mut u64) -> u64 {
        *state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *state
    }

    fn apply_internal(&mut self, op: Operation, _run_id: &str) -> Result<OpResult, EngineError> {
        let op_id = self.next_op_id();
        let mut result = OpResult {
            op_id,
            added: vec![],
            removed: vec![],
            warnings: vec![],
            messages: vec![],
        };
        tracing::debug!(?op, "applying operation");

        match op {
            Operation::AddSample { name, id } => {
                let name = Self::accept_name(&name, "sample")?;
                self.dashboard.add_sample(Sample::new(name.clone(), id));
                result.messages.push(format!("Added sample '{name}'"));
                result.added.push(name);
            }
            Operation::AddTest { name, duration } => {
                let name = Self::accept_name(&name, "test")?;
                self.dashboard.add_test(LabTest::new(name.clone(), duration));
                result.messages.push(format!("Added test '{name}'"));
                result.added.push(name);
            }
            Operation::AddEquipment {
                name,
                service_urgency,
            } => {
                let name = Self::accept_name(&name, "equipment")?;
                self.dashboard
                    .add_equipment(Equipment::new(name.clone(), service_urgency));
                result.messages.push(format!("Added equipment '{name}'"));
                result.added.push(name);
            }
            Operation::DeleteSamples { indices } => {
                for (count, index) in indices.iter().enumerate() {
                    let sample = self
                        .dashboard
                        .delete_sample(Self::shifted_index(*index, count)?)?;
                    result.removed.push(sample.name);
                }
                result
                    .messages
                    .push(format!("Deleted {} sample(s)", result.removed.len()));
            }
            Operation::DeleteTests { indices } => {
                for (count, index) in indices.iter().enumerate() {
                    let test = self
                        .dashboard
                        .delete_test(Self::shifted_index(*index, count)?)?;
                    result.removed.push(test.name);
                }
                result
                    .messages
                    .push(format!("Deleted {} test(s)", result.removed.len()));
            }
            Operation::DeleteEquipment { indices } => {
                for (count, index) in indices.iter().enumerate() {
                    let equipment = self
                        .dashboard
                        .delete_equipment(Self::shifted_index(*index, count)?)?;
                    result.removed.push(equipment.name);
                }
                result
                    .messages
                    .push(format!("Deleted {} equipment item(s)", result.removed.len()));
            }
            Operation::AddTestsToSamples { samples, tests } => {
                let known_samples = self.dashboard.names_of_samples();
                let known_tests = self.dashboard.names_of_tests();
                for name in &samples {
                    if !known_samples.contains(name) {
                        result.warnings.push(format!("No sample named '{name}'"));
                    }
                }
                for name in &tests {
                    if !known_tests.contains(name) {
                        result.warnings.push(format!("No test named '{name}'"));
                    }
                }
                let mut pairs = 0usize;
                for (test, sample) in iproduct!(&tests, &samples) {
                    self.dashboard.add_test_to_sample(sample, test);
                    pairs += 1;
                }
                result
                    .messages
                    .push(format!("Requested {pairs} test/sample pair(s)"));
            }
            Operation::SortSamplesById => {
                self.dashboard.sort_samples_by_id();
                result.messages.push("Sorted samples by id".to_string());
            }
            Operation::SortTests { priority } => {
                self.dashboard.sort_tests_by_priority(priority);
                result
                    .messages
                    .push(format!("Sorted tests by {priority:?}"));
            }
            Operation::SortEquipmentByServiceUrgency => {
                self.dashboard.sort_equipment_by_service_urgency();
                result
                    .messages
                    .push("Sorted equipment by service urgency".to_string());
            }
            Operation::ClearSamples => {
                let count = self.dashboard.samples().len();
                self.dashboard.clear_samples();
                result.messages.push(format!("Cleared {count} sample(s)"));
            }
            Operation::ClearTests => {
                let count = self.dashboard.tests().len();
                self.dashboard.clear_tests();
                result.messages.push(format!("Cleared {count} test(s)"));
            }
            Operation::ClearEquipment => {
                let count = self.dashboard.equipment().len();
                self.dashboard.clear_equipment();
                result
                    .messages
                    .push(format!("Cleared {count} equipment item(s)"));
            }
            Operation::Autogenerate => {
                let roster = DemoRoster::builtin();
                self.dashboard.clear_samples();
                self.dashboard.clear_tests();
                self.dashboard.clear_equipment();

                let mut state = self.parameters.autogenerate_seed;
                for name in &roster.samples {
                    let id = (Self::lcg_next(&mut state) % 100_000) as i64;
                    self.dashboard.add_sample(Sample::new(name.clone(), id));
                    result.added.push(name.clone());
                }
                for name in &roster.tests {
                    let duration = (Self::lcg_next(&mut state) % 10 + 1) as u32;
                    self.dashboard.add_test(LabTest::new(name.clone(), duration));
                    result.added.push(name.clone());
                }
                for name in &roster.equipment {
                    let service_urgency = (Self::lcg_next(&mut state) % 365) as i64;
                    self.dashboard
                        .add_equipment(Equipment::new(name.clone(), service_urgency));
                    result.added.push(name.clone());
                }
                result.messages.push(format!(
                    "Autogenerated {} sample(s), {} test(s), {} equipment item(s)",
                    roster.samples.len(),
                    roster.tests.len(),
                    roster.equipment.len()
                ));
            }
            Operation::SetParameter { name, value } => match name.as_str() {
                "autogenerate_seed" => {
                    let seed = value.as_u64().ok_or_else(|| EngineError {
                        code: ErrorCode::InvalidInput,
                        message: format!("Parameter '{name}' expects an unsigned integer"),
                    })?;
                    self.parameters.autogenerate_seed = seed;
                    result
                        .messages
                        .push(format!("Set parameter '{name}' to {seed}"));
                }
                _ => {
                    return Err(EngineError {
                        code: ErrorCode::Unsupported,
                        message: format!("Unknown parameter '{name}'"),
                    });
                }
            },
        }

        Ok(result)
    }
}

impl Engine for LabFlowEngine {
    fn apply(&mut self, op: Operation) -> Result<OpResult, EngineError> {
        let run_id = "interactive".to_string();
        let result = self.apply_internal(op.clone(), &run_id)?;
        self.journal.push(OperationRecord {
            run_id,
            op,
            result: result.clone(),
        });
        Ok(result)
    }

    fn apply_workflow(&mut self, wf: Workflow) -> Result<Vec<OpResult>, EngineError> {
        let mut results = Vec::new();
        for op in &wf.ops {
            let result = self.apply_internal(op.clone(), &wf.run_id)?;
            self.journal.push(OperationRecord {
                run_id: wf.run_id.clone(),
                op: op.clone(),
                result: result.clone(),
            });
            results.push(result);
        }
        Ok(results)
    }

    fn snapshot(&self) -> &Dashboard {
        &self.dashboard
    }
}
