//! Workflow router
//!
//! A small directed-graph engine: nodes are async units of work over a
//! shared `WorkflowState`; edges are pure predicates over that state with no
//! side effects. The same engine runs the generic linear flow and the richer
//! leave-application flow by supplying different node sets.
//!
//! ```text
//! generic:  validate ──▶ approval_gate ──▶ execute ──▶ respond
//!              └─(incomplete | invalid)──▶ END
//!
//! leave:    validate ──▶ check_balance ──▶ approval_gate ──▶ execute ──▶ respond
//!              │              └─(insufficient)──▶ suggest_alternatives ──▶ END
//!              └─(incomplete | invalid)──▶ END
//! ```

mod nodes;

pub use nodes::{
    ApprovalGateNode, CheckBalanceNode, ExecuteNode, RespondNode, SuggestAlternativesNode,
    ValidateNode,
};

use crate::policy::ValidationPolicy;
use crate::request::ActionRequest;
use crate::EngineError;
use async_trait::async_trait;
use hr_agent_config::DomainConfig;
use hr_agent_core::{ConversationPhase, Intent, SlotMap};
use hr_agent_tools::ToolExecutor;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared collaborators available to every node
pub struct WorkflowContext {
    pub executor: Arc<dyn ToolExecutor>,
    pub policy: Arc<ValidationPolicy>,
    pub domain: Arc<DomainConfig>,
}

/// Mutable state threaded through a workflow run
#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub user_id: String,
    pub intent: Intent,
    pub slots: SlotMap,
    /// Question proposed by the extractor, if any
    pub extraction_question: Option<String>,
    /// Reference leave-type names
    pub leave_types: Vec<String>,

    // Filled by nodes:
    pub request: Option<ActionRequest>,
    pub requires_approval: bool,
    pub incomplete: bool,
    pub invalid: bool,
    pub balance: Option<f64>,
    pub sufficient_balance: bool,
    pub execution_error: Option<String>,
    pub response: Option<String>,
    pub document: Option<Value>,
    pub phase: ConversationPhase,
    /// Conversation finished successfully; the engine clears the session
    pub clear_session: bool,
}

impl WorkflowState {
    pub fn new(
        user_id: impl Into<String>,
        intent: Intent,
        slots: SlotMap,
        extraction_question: Option<String>,
        leave_types: Vec<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            intent,
            slots,
            extraction_question,
            leave_types,
            request: None,
            requires_approval: false,
            incomplete: false,
            invalid: false,
            balance: None,
            sufficient_balance: true,
            execution_error: None,
            response: None,
            document: None,
            phase: ConversationPhase::Collecting,
            clear_session: false,
        }
    }

    /// Move to a new phase. An illegal transition indicates a routing bug,
    /// not a user error, so it is logged and the run proceeds.
    pub fn advance(&mut self, target: ConversationPhase) {
        if !self.phase.can_transition_to(target) {
            tracing::warn!(from = %self.phase, to = %target, "Illegal phase transition");
        }
        self.phase = target;
    }
}

/// Edge condition: a pure predicate over the state
pub type EdgePredicate = fn(&WorkflowState) -> bool;

/// Edge target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Node(&'static str),
    End,
}

/// One unit of work in a workflow
#[async_trait]
pub trait WorkflowNode: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(
        &self,
        state: &mut WorkflowState,
        ctx: &WorkflowContext,
    ) -> Result<(), EngineError>;
}

/// A directed workflow graph
pub struct WorkflowGraph {
    entry: &'static str,
    nodes: HashMap<&'static str, Arc<dyn WorkflowNode>>,
    edges: HashMap<&'static str, Vec<(EdgePredicate, Target)>>,
}

/// Safety bound on graph evaluation; real flows are a handful of nodes deep.
const MAX_STEPS: usize = 16;

impl WorkflowGraph {
    pub fn new(entry: &'static str) -> Self {
        Self {
            entry,
            nodes: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    pub fn add_node(mut self, node: impl WorkflowNode + 'static) -> Self {
        self.nodes.insert(node.name(), Arc::new(node));
        self
    }

    /// Add a conditional edge. Edges are evaluated in insertion order; the
    /// first predicate that holds wins, and a node with no matching edge
    /// ends the run.
    pub fn add_edge(mut self, from: &'static str, predicate: EdgePredicate, to: Target) -> Self {
        self.edges.entry(from).or_default().push((predicate, to));
        self
    }

    /// Unconditional edge
    pub fn add_default_edge(self, from: &'static str, to: Target) -> Self {
        self.add_edge(from, |_| true, to)
    }

    /// Evaluate the graph from its entry node
    pub async fn run(
        &self,
        state: &mut WorkflowState,
        ctx: &WorkflowContext,
    ) -> Result<(), EngineError> {
        let mut current = self.entry;

        for _ in 0..MAX_STEPS {
            let node = self.nodes.get(current).ok_or_else(|| {
                EngineError::Workflow(format!("unknown workflow node '{}'", current))
            })?;

            tracing::debug!(node = current, intent = %state.intent, "Workflow node");
            node.run(state, ctx).await?;

            let next = self
                .edges
                .get(current)
                .and_then(|edges| {
                    edges
                        .iter()
                        .find(|(predicate, _)| predicate(state))
                        .map(|(_, target)| *target)
                })
                .unwrap_or(Target::End);

            match next {
                Target::End => return Ok(()),
                Target::Node(name) => current = name,
            }
        }

        Err(EngineError::Workflow(format!(
            "workflow exceeded {} steps (cycle?)",
            MAX_STEPS
        )))
    }
}

/// Build the generic linear flow shared by every simple intent family.
pub fn generic_flow() -> WorkflowGraph {
    WorkflowGraph::new("validate")
        .add_node(ValidateNode)
        .add_node(ApprovalGateNode)
        .add_node(ExecuteNode)
        .add_node(RespondNode)
        .add_edge("validate", |s| s.incomplete || s.invalid, Target::End)
        .add_default_edge("validate", Target::Node("approval_gate"))
        .add_default_edge("approval_gate", Target::Node("execute"))
        .add_default_edge("execute", Target::Node("respond"))
        .add_default_edge("respond", Target::End)
}

/// Build the leave-application flow with balance checking and alternative
/// suggestions.
pub fn leave_flow() -> WorkflowGraph {
    WorkflowGraph::new("validate")
        .add_node(ValidateNode)
        .add_node(CheckBalanceNode)
        .add_node(SuggestAlternativesNode)
        .add_node(ApprovalGateNode)
        .add_node(ExecuteNode)
        .add_node(RespondNode)
        .add_edge("validate", |s| s.incomplete || s.invalid, Target::End)
        .add_default_edge("validate", Target::Node("check_balance"))
        .add_edge(
            "check_balance",
            |s| !s.sufficient_balance,
            Target::Node("suggest_alternatives"),
        )
        .add_default_edge("check_balance", Target::Node("approval_gate"))
        .add_default_edge("suggest_alternatives", Target::End)
        .add_default_edge("approval_gate", Target::Node("execute"))
        .add_default_edge("execute", Target::Node("respond"))
        .add_default_edge("respond", Target::End)
}
