//! The manager-facing dispatcher.
//!
//! Every manager call is resolved through the vault's
//! [`ValidatorRegistry`], decided by the mapped validator, and only then
//! forwarded. Batches are all-or-nothing: any failure rolls the forwarder
//! back to the state before the batch started.

use std::sync::Arc;

use alloy::primitives::{hex, Address, Bytes, B256, U256};
use serde_json::json;
use teavault_core::{
    AccessError, AuditEvent, AuditSink, CallRequest, Decision, Denial, RoleSet, ValidatorRegistry,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::forwarder::{CallForwarder, Reverted};
use crate::signature;

/// Why a manager call was not carried out.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Unauthorized(#[from] AccessError),
    #[error("contract {target} is not in the whitelist")]
    UnmappedTarget { target: Address },
    #[error("call to {target} denied by validator {validator}: {denial}")]
    PolicyDenied {
        target: Address,
        validator: Address,
        denial: Denial,
    },
    #[error("malformed payload for {target}: {denial}")]
    MalformedPayload { target: Address, denial: Denial },
    #[error("forwarded call to {target} failed: {reverted}")]
    ForwardedCallFailure {
        target: Address,
        #[source]
        reverted: Reverted,
    },
    #[error(
        "batch arguments differ in length: {targets} targets, {values} values, {payloads} payloads"
    )]
    InputShape {
        targets: usize,
        values: usize,
        payloads: usize,
    },
}

impl DispatchError {
    /// Whether the call was refused by policy (unmapped, denied, or
    /// undecodable) rather than by role or by the callee.
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            Self::UnmappedTarget { .. } | Self::PolicyDenied { .. } | Self::MalformedPayload { .. }
        )
    }

    fn outcome(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::ForwardedCallFailure { .. } => "reverted",
            _ => "denied",
        }
    }
}

/// A custodial vault whose manager can only act through validated calls.
pub struct Vault<F: CallForwarder> {
    address: Address,
    roles: RoleSet,
    registry: Arc<ValidatorRegistry>,
    forwarder: F,
    audit: Option<Box<dyn AuditSink>>,
    /// Events of the batch in progress, written once it commits.
    pending: Option<Vec<AuditEvent>>,
}

impl<F: CallForwarder> Vault<F> {
    /// A vault with no manager and an empty registry administered by `owner`.
    pub fn new(address: Address, owner: Address, forwarder: F) -> Self {
        Self {
            address,
            roles: RoleSet::new(owner),
            registry: Arc::new(ValidatorRegistry::new(owner)),
            forwarder,
            audit: None,
            pending: None,
        }
    }

    /// Record every manager call attempt to `sink`.
    pub fn with_audit_sink(mut self, sink: impl AuditSink + 'static) -> Self {
        self.audit = Some(Box::new(sink));
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.roles.owner()
    }

    pub fn manager(&self) -> Option<Address> {
        self.roles.manager()
    }

    pub fn investor(&self) -> Option<Address> {
        self.roles.investor()
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn registry(&self) -> &Arc<ValidatorRegistry> {
        &self.registry
    }

    pub fn forwarder(&self) -> &F {
        &self.forwarder
    }

    pub fn assign_manager(&mut self, caller: Address, manager: Address) -> Result<(), AccessError> {
        self.roles.assign_manager(caller, manager)?;
        info!(vault = %self.address, %manager, "manager assigned");
        Ok(())
    }

    pub fn assign_investor(&mut self, caller: Address, investor: Address) -> Result<(), AccessError> {
        self.roles.assign_investor(caller, investor)?;
        info!(vault = %self.address, %investor, "investor assigned");
        Ok(())
    }

    pub fn set_allow_manager_signature(
        &mut self,
        caller: Address,
        allow: bool,
    ) -> Result<(), AccessError> {
        self.roles.set_allow_manager_signature(caller, allow)?;
        info!(vault = %self.address, allow, "manager signature permission changed");
        Ok(())
    }

    /// Swap in a different registry. Owner only.
    pub fn assign_registry(
        &mut self,
        caller: Address,
        registry: Arc<ValidatorRegistry>,
    ) -> Result<(), AccessError> {
        self.roles.require_owner(caller)?;
        self.registry = registry;
        info!(vault = %self.address, entries = self.registry.len(), "registry assigned");
        Ok(())
    }

    /// EIP-1271 check against the vault's current roles.
    pub fn is_valid_signature(&self, hash: B256, signature: &[u8]) -> [u8; 4] {
        signature::is_valid_signature(&self.roles, hash, signature)
    }

    /// Forward one call for the manager.
    pub fn execute_manager_call(
        &mut self,
        caller: Address,
        target: Address,
        value: U256,
        payload: impl Into<Bytes>,
    ) -> Result<Bytes, DispatchError> {
        let request = CallRequest::new(target, value, payload);
        self.authorize(caller, Some(&request))?;

        let checkpoint = self.forwarder.checkpoint();
        match self.dispatch(caller, &request) {
            Ok(output) => Ok(output),
            Err(e) => {
                self.forwarder.rollback(checkpoint);
                Err(e)
            }
        }
    }

    /// Forward several calls for the manager as one atomic unit.
    pub fn execute_manager_call_batch(
        &mut self,
        caller: Address,
        targets: &[Address],
        values: &[U256],
        payloads: &[Bytes],
    ) -> Result<Vec<Bytes>, DispatchError> {
        self.authorize(caller, None)?;
        if targets.len() != values.len() || targets.len() != payloads.len() {
            let err = DispatchError::InputShape {
                targets: targets.len(),
                values: values.len(),
                payloads: payloads.len(),
            };
            warn!(vault = %self.address, error = %err, "batch rejected");
            self.record(caller, None, err.outcome(), json!({ "reason": err.to_string() }));
            return Err(err);
        }

        let checkpoint = self.forwarder.checkpoint();
        self.pending = Some(Vec::with_capacity(targets.len()));
        let mut outputs = Vec::with_capacity(targets.len());
        for ((target, value), payload) in targets.iter().zip(values).zip(payloads) {
            let request = CallRequest::new(*target, *value, payload.clone());
            match self.dispatch(caller, &request) {
                Ok(output) => outputs.push(output),
                Err(e) => {
                    warn!(
                        vault = %self.address,
                        step = outputs.len(),
                        "batch aborted, rolling back"
                    );
                    self.forwarder.rollback(checkpoint);
                    self.abandon_batch(caller);
                    return Err(e);
                }
            }
        }
        for event in self.pending.take().unwrap_or_default() {
            self.emit(event);
        }
        Ok(outputs)
    }

    /// Write the failing step's event, replacing the events of the steps
    /// that were forwarded and then undone with a single `rolled_back` event.
    fn abandon_batch(&mut self, caller: Address) {
        let (undone, failed): (Vec<_>, Vec<_>) = self
            .pending
            .take()
            .unwrap_or_default()
            .into_iter()
            .partition(|event| event.outcome == "forwarded");
        for event in failed {
            self.emit(event);
        }
        if !undone.is_empty() {
            let steps: Vec<_> = undone.into_iter().map(|event| event.details).collect();
            self.record(
                caller,
                None,
                "rolled_back",
                json!({ "undone": steps.len(), "steps": steps }),
            );
        }
    }

    fn authorize(&mut self, caller: Address, request: Option<&CallRequest>) -> Result<(), DispatchError> {
        if let Err(e) = self.roles.require_manager(caller) {
            warn!(vault = %self.address, %caller, "manager call from non-manager");
            self.record(caller, request, "unauthorized", json!({ "reason": e.to_string() }));
            return Err(e.into());
        }
        Ok(())
    }

    /// Resolve, decide and forward a single call.
    fn dispatch(&mut self, caller: Address, request: &CallRequest) -> Result<Bytes, DispatchError> {
        let target = request.target;
        let Some(validator) = self.registry.resolve(target) else {
            let err = DispatchError::UnmappedTarget { target };
            warn!(vault = %self.address, %target, "no validator for target");
            self.record(caller, Some(request), "denied", json!({ "reason": err.to_string() }));
            return Err(err);
        };
        debug!(%target, validator = %validator.address(), kind = validator.kind(), "validator resolved");

        if let Decision::Deny(denial) = validator.decide(self.address, request) {
            warn!(vault = %self.address, %target, validator = %validator.address(), %denial, "call denied");
            self.record(
                caller,
                Some(request),
                "denied",
                json!({ "validator": validator.address().to_string(), "reason": denial.to_string() }),
            );
            return Err(if denial.is_malformed() {
                DispatchError::MalformedPayload { target, denial }
            } else {
                DispatchError::PolicyDenied {
                    target,
                    validator: validator.address(),
                    denial,
                }
            });
        }

        match self.forwarder.forward(self.address, request) {
            Ok(output) => {
                info!(vault = %self.address, %target, value = %request.value, "call forwarded");
                self.record(
                    caller,
                    Some(request),
                    "forwarded",
                    json!({ "validator": validator.address().to_string() }),
                );
                Ok(output)
            }
            Err(reverted) => {
                warn!(vault = %self.address, %target, reason = %reverted.reason, "forwarded call reverted");
                self.record(
                    caller,
                    Some(request),
                    "reverted",
                    json!({ "reason": &reverted.reason, "data": reverted.data.to_string() }),
                );
                Err(DispatchError::ForwardedCallFailure { target, reverted })
            }
        }
    }

    fn record(
        &mut self,
        caller: Address,
        request: Option<&CallRequest>,
        outcome: &str,
        extra: serde_json::Value,
    ) {
        if self.audit.is_none() {
            return;
        }
        let mut details = json!({
            "vault": self.address.to_string(),
            "caller": caller.to_string(),
        });
        if let Some(request) = request {
            details["target"] = json!(request.target.to_string());
            details["value"] = json!(request.value.to_string());
            details["selector"] = json!(request.selector().map(hex::encode_prefixed));
        }
        if let (Some(details), serde_json::Value::Object(extra)) = (details.as_object_mut(), extra) {
            details.extend(extra);
        }
        let event = AuditEvent::new("manager_call", details, outcome);
        match self.pending.as_mut() {
            Some(pending) => pending.push(event),
            None => self.emit(event),
        }
    }

    fn emit(&mut self, event: AuditEvent) {
        let Some(sink) = self.audit.as_mut() else {
            return;
        };
        if let Err(e) = sink.record(event) {
            warn!(error = %e, "failed to write audit event");
        }
    }
}

impl<F: CallForwarder + std::fmt::Debug> std::fmt::Debug for Vault<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("address", &self.address)
            .field("roles", &self.roles)
            .field("registry", &self.registry)
            .field("forwarder", &self.forwarder)
            .field("audit", &self.audit.is_some())
            .finish()
    }
}
