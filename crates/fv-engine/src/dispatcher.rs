//! Request dispatch
//!
//! The dispatcher is what a service puts in front of the engine: a first
//! request creates a processor under a fresh id, a request carrying an id
//! resumes the persisted processor, and a close request drops it.

use fv_core::{Request, Response, Uuid, ValueKind};
use fv_heuristics::{IntegerKind, IntegerSpec, StringKind, StringSpec};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, LoadCause};
use crate::processor::{RequestProcessor, delete_persisted};
use crate::store::ProcessorStore;

/// Request envelope tagged by target type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireRequest {
    Integer(Request<IntegerSpec>),
    String(Request<StringSpec>),
    /// Drop a persisted processor
    Close { id: Uuid },
}

/// Response envelope mirroring [`WireRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireResponse {
    Integer(Response<i64>),
    String(Response<String>),
    Closed { id: Uuid },
}

/// Routes requests to new or resumed processors backed by one store
pub struct RequestDispatcher<S> {
    store: S,
    config: EngineConfig,
}

impl<S: ProcessorStore> RequestDispatcher<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Serve one request and persist the processor behind it
    pub fn process<K: ValueKind>(
        &self,
        mut request: Request<K::Spec>,
    ) -> EngineResult<Response<K::Value>> {
        let clamped = self.clamp(&mut request);

        let mut processor = match request.id {
            None => RequestProcessor::<K>::new(request, Uuid::new_v4()),
            Some(id) => {
                let mut processor = RequestProcessor::<K>::load(&self.store, id)
                    .map_err(|e| wrong_kind_as_continuation(e, &request))?;
                processor.continue_request(request)?;
                processor
            }
        };

        let mut response = processor.build_response().clone();
        processor.serialize_with(&self.store, self.config.pretty_records)?;

        if let Some(warning) = clamped {
            response.warnings.request_warnings.push(warning);
        }
        Ok(response)
    }

    /// Delete the processor persisted under `id`
    pub fn close(&self, id: Uuid) -> EngineResult<()> {
        delete_persisted(&self.store, id)
    }

    /// Serve a tagged request
    pub fn handle(&self, request: WireRequest) -> EngineResult<WireResponse> {
        match request {
            WireRequest::Integer(request) => {
                self.process::<IntegerKind>(request).map(WireResponse::Integer)
            }
            WireRequest::String(request) => {
                self.process::<StringKind>(request).map(WireResponse::String)
            }
            WireRequest::Close { id } => {
                self.close(id)?;
                Ok(WireResponse::Closed { id })
            }
        }
    }

    fn clamp<Sp>(&self, request: &mut Request<Sp>) -> Option<String> {
        let cap = self.config.max_values_cap;
        if request.max_values <= cap {
            return None;
        }

        let warning = format!(
            "maxValues {} exceeds the limit of {}, clamped",
            request.max_values, cap
        );
        log::warn!("{}", warning);
        request.max_values = cap;
        Some(warning)
    }
}

/// A request resuming a processor of another kind is not its continuation
fn wrong_kind_as_continuation<Sp>(error: EngineError, request: &Request<Sp>) -> EngineError {
    match error {
        EngineError::LoadFailed {
            id,
            cause:
                LoadCause::WrongKind {
                    stored,
                    requested,
                    name,
                },
        } => {
            log::warn!(
                "Processor {} serves {} values, request {:?} is for {}",
                id,
                stored,
                request.name,
                requested
            );
            EngineError::InvalidContinuation {
                expected_name: name,
                expected_id: id,
                name: request.name.clone(),
                id: request.id,
            }
        }
        other => other,
    }
}
