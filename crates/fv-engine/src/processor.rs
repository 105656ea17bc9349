//! Request processor
//!
//! One processor serves one logical request across its whole life:
//!
//! ```text
//! new(request, id) ──► Configured ──build_response──► Responded
//!                          ▲                              │
//!                          └──────continue_request────────┘
//! ```
//!
//! Persistence is orthogonal to the state: `serialize` writes a record at any
//! point, `load` resumes from it in the `Configured` state, `delete` removes it.

use fv_core::{ComposedHeuristic, Heuristic, Request, Response, Uuid, ValueKind, WarningsSection};

use crate::error::{DeleteCause, EngineError, EngineResult, LoadCause, PersistCause};
use crate::record::{FORMAT_VERSION, ProcessorRecord};
use crate::store::ProcessorStore;

/// Lifecycle state of a processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// Heuristics selected, no response built since the last configuration
    Configured,
    /// A response has been built and is cached
    Responded,
}

/// Orchestrates heuristic selection, draining and persistence for one request
pub struct RequestProcessor<K: ValueKind> {
    id: Uuid,
    seed: u64,
    max_values: usize,
    request: Request<K::Spec>,
    valid_values: Vec<K::Value>,
    composed: ComposedHeuristic<K::Value>,
    warnings: WarningsSection,
    state: ProcessorState,
    response: Option<Response<K::Value>>,
}

impl<K: ValueKind> RequestProcessor<K> {
    /// Create a processor for a first request, selecting generators then operators
    pub fn new(mut request: Request<K::Spec>, id: Uuid) -> Self {
        request.id = Some(id);
        let valid_values = K::parse_valid_values(request.raw_valid_values());

        let mut processor = Self {
            id,
            seed: request.seed,
            max_values: request.max_values,
            composed: ComposedHeuristic::new(request.seed),
            valid_values,
            request,
            warnings: WarningsSection::new(),
            state: ProcessorState::Configured,
            response: None,
        };
        processor.add_requested_generators();
        processor.add_requested_operators();

        log::info!(
            "Created {} processor {} for {:?} with {} heuristic(s)",
            K::NAME,
            id,
            processor.request.name,
            processor.composed.len()
        );
        processor
    }

    fn add_requested_generators(&mut self) {
        let spec = &self.request.specification;

        // useNoGenerators only suppresses the default set
        if self.request.requested_generators.is_empty() {
            if self.request.use_no_generators {
                log::debug!("Default generators disabled for {}", self.id);
                return;
            }
            for generator in K::default_generators(spec, self.seed) {
                log::debug!("Adding default generator {}", generator.name());
                self.composed.add(generator);
            }
            return;
        }

        for requested in &self.request.requested_generators {
            match K::create_generator(
                &requested.name,
                requested.parameter.as_deref(),
                spec,
                self.seed,
            ) {
                Ok(generator) => self.composed.add(generator),
                Err(e) => {
                    log::warn!("Skipping {}", e);
                    self.warnings.add_illegal_generator(&requested.name, e.reason());
                }
            }
        }
    }

    fn add_requested_operators(&mut self) {
        let spec = &self.request.specification;
        let requested = self.request.requested_operators();

        if requested.is_empty() {
            if !self.valid_values.is_empty() {
                for operator in K::default_operators(&self.valid_values, spec, self.seed) {
                    log::debug!("Adding default operator {}", operator.name());
                    self.composed.add(operator);
                }
            }
            return;
        }

        for requested in requested {
            match K::create_operator(
                &requested.name,
                &self.valid_values,
                requested.parameter.as_deref(),
                spec,
                self.seed,
            ) {
                Ok(operator) => self.composed.add(operator),
                Err(e) => {
                    log::warn!("Skipping {}", e);
                    self.warnings.add_illegal_operator(&requested.name, e.reason());
                }
            }
        }
    }

    /// Build a response for the current bound.
    ///
    /// The header is always filled in. Values are drained only when the
    /// request validates; its warnings are attached either way.
    pub fn build_response(&mut self) -> &Response<K::Value> {
        let validation = self.request.validate();
        let mut response = Response::header(&self.request.name, self.id, self.seed);
        response.warnings = self.warnings.clone();

        if validation.is_valid() {
            let remaining = (self.max_values as u64).saturating_sub(self.composed.emitted());
            let bound = usize::try_from(remaining).unwrap_or(usize::MAX);
            response.values = self.composed.next_values(bound);
        } else {
            log::warn!(
                "Request {:?} ({}) is invalid, responding without values",
                self.request.name,
                self.id
            );
        }
        response.warnings.add_request_warnings(validation.into_warnings());

        log::debug!(
            "Built response for {} with {} value(s)",
            self.id,
            response.values.len()
        );
        self.state = ProcessorState::Responded;
        self.response.insert(response)
    }

    /// The response of the last `build_response`, if any
    pub fn response(&self) -> Option<&Response<K::Value>> {
        self.response.as_ref()
    }

    /// Continue with a follow-up request for the same name and id.
    ///
    /// The bound is raised to the new `maxValues`; a smaller value keeps the
    /// current bound. Heuristics are not re-selected.
    pub fn continue_request(&mut self, request: Request<K::Spec>) -> EngineResult<()> {
        if request.name != self.request.name || request.id != Some(self.id) {
            return Err(EngineError::InvalidContinuation {
                expected_name: self.request.name.clone(),
                expected_id: self.id,
                name: request.name,
                id: request.id,
            });
        }

        if request.max_values < self.max_values {
            log::warn!(
                "Continuation of {} asks for {} values, keeping {}",
                self.id,
                request.max_values,
                self.max_values
            );
        } else {
            self.max_values = request.max_values;
            self.request.max_values = request.max_values;
        }

        log::info!("Continuing {} up to {} values", self.id, self.max_values);
        self.response = None;
        self.state = ProcessorState::Configured;
        Ok(())
    }

    /// Persist with compact encoding
    pub fn serialize<S: ProcessorStore + ?Sized>(&self, store: &S) -> EngineResult<()> {
        self.serialize_with(store, false)
    }

    /// Persist the processor under its id
    pub fn serialize_with<S: ProcessorStore + ?Sized>(
        &self,
        store: &S,
        pretty: bool,
    ) -> EngineResult<()> {
        let blob = self
            .to_record()
            .encode(pretty)
            .map_err(|e| EngineError::persist(self.id, PersistCause::Encode(e)))?;
        store
            .put(&self.id, &blob)
            .map_err(|e| EngineError::persist(self.id, PersistCause::Storage(e)))?;

        log::info!(
            "Persisted processor {} ({} of {} values emitted)",
            self.id,
            self.composed.emitted(),
            self.max_values
        );
        Ok(())
    }

    /// Restore a persisted processor
    pub fn load<S: ProcessorStore + ?Sized>(store: &S, id: Uuid) -> EngineResult<Self> {
        let blob = store
            .get(&id)
            .map_err(|e| EngineError::load(id, LoadCause::Storage(e)))?
            .ok_or_else(|| EngineError::load(id, LoadCause::NotFound))?;

        let record = ProcessorRecord::<K::Spec>::decode(&blob, K::NAME, &id)
            .map_err(|cause| EngineError::load(id, cause))?;
        let processor = Self::from_record(record).map_err(|cause| EngineError::load(id, cause))?;

        log::info!(
            "Loaded processor {} ({} values emitted)",
            id,
            processor.composed.emitted()
        );
        Ok(processor)
    }

    /// Remove this processor's persisted record
    pub fn delete<S: ProcessorStore + ?Sized>(&self, store: &S) -> EngineResult<()> {
        delete_persisted(store, self.id)
    }

    fn to_record(&self) -> ProcessorRecord<K::Spec> {
        ProcessorRecord {
            format_version: FORMAT_VERSION,
            kind: K::NAME.to_string(),
            id: self.id,
            seed: self.seed,
            max_values: self.max_values,
            request: self.request.clone(),
            warnings: self.warnings.clone(),
            composition: self.composed.snapshot(),
        }
    }

    fn from_record(record: ProcessorRecord<K::Spec>) -> Result<Self, LoadCause> {
        let valid_values = K::parse_valid_values(record.request.raw_valid_values());
        let spec = &record.request.specification;
        let seed = record.seed;

        let composed = ComposedHeuristic::restore(&record.composition, |descriptor| {
            K::recreate(descriptor, &valid_values, spec, seed)
        })
        .map_err(|e| LoadCause::Corrupt(e.to_string()))?;

        Ok(Self {
            id: record.id,
            seed,
            max_values: record.max_values,
            request: record.request,
            valid_values,
            composed,
            warnings: record.warnings,
            state: ProcessorState::Configured,
            response: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn max_values(&self) -> usize {
        self.max_values
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn request(&self) -> &Request<K::Spec> {
        &self.request
    }

    /// Valid values that survived parsing
    pub fn valid_values(&self) -> &[K::Value] {
        &self.valid_values
    }

    /// Heuristic warnings collected at construction
    pub fn warnings(&self) -> &WarningsSection {
        &self.warnings
    }

    /// Number of configured heuristics
    pub fn heuristic_count(&self) -> usize {
        self.composed.len()
    }

    /// Values emitted over the processor's lifetime
    pub fn emitted(&self) -> u64 {
        self.composed.emitted()
    }
}

/// Remove the persisted record for `id`
pub fn delete_persisted<S: ProcessorStore + ?Sized>(store: &S, id: Uuid) -> EngineResult<()> {
    match store.delete(&id) {
        Ok(true) => {
            log::info!("Deleted processor {}", id);
            Ok(())
        }
        Ok(false) => {
            log::warn!("No persisted processor {} to delete", id);
            Err(EngineError::delete(id, DeleteCause::NotFound))
        }
        Err(e) => {
            log::warn!("Failed to delete processor {}: {}", id, e);
            Err(EngineError::delete(id, DeleteCause::Storage(e)))
        }
    }
}
