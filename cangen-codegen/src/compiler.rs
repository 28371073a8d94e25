//! Batch compilation of message schemas.
//!
//! Every definition runs through its own pipeline
//! (validate, expand, compile layout, derive codec) on a pool of scoped
//! worker threads fed by a channel. Pipelines share nothing; the only
//! synchronization point is the join before identifiers are aggregated.

use crate::codec::CodecSpec;
use crate::error::{CompileError, CodegenError};
use crate::identifiers::IdentifierEnum;
use cangen_schema::types::ByteOrder;
use cangen_schema::{MessageDefinition, SchemaSet, expand, parse_schema_partial};
use std::num::NonZeroUsize;
use std::thread;

/// Outcome of one definition's pipeline.
type MessageOutcome = (Vec<CodecSpec>, Vec<CompileError>);

/// Builder for configuring a [`Compiler`].
#[derive(Debug, Clone)]
pub struct CompilerBuilder {
    workers: usize,
    float_order: ByteOrder,
}

impl CompilerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            workers: thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            float_order: ByteOrder::default(),
        }
    }

    /// Sets the number of worker threads. Zero is treated as one.
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets the byte order of `float32` payload bytes.
    #[must_use]
    pub fn float_order(mut self, order: ByteOrder) -> Self {
        self.float_order = order;
        self
    }

    /// Builds the compiler.
    #[must_use]
    pub fn build(self) -> Compiler {
        Compiler {
            workers: self.workers,
            float_order: self.float_order,
        }
    }
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Schema-to-codec compiler.
#[derive(Debug, Clone)]
pub struct Compiler {
    workers: usize,
    float_order: ByteOrder,
}

impl Compiler {
    /// Creates a builder for configuring a compiler.
    #[must_use]
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    /// Returns the number of worker threads.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns the configured `float32` byte order.
    #[must_use]
    pub fn float_order(&self) -> ByteOrder {
        self.float_order
    }

    /// Compiles a batch of definitions.
    ///
    /// Codecs come back in declaration order, family members in index
    /// order. Every error of every message is collected; a bad message
    /// never stops the rest of the batch.
    pub fn compile(&self, set: impl Into<SchemaSet>) -> CompileReport {
        let definitions = set.into().into_definitions();
        let outcomes = self.run(&definitions);

        let mut codecs = Vec::new();
        let mut errors = Vec::new();
        for (mut message_codecs, mut message_errors) in outcomes {
            codecs.append(&mut message_codecs);
            errors.append(&mut message_errors);
        }

        let (identifiers, mut duplicates) = IdentifierEnum::build(&codecs);
        errors.append(&mut duplicates);

        for error in &errors {
            tracing::warn!("{error}");
        }
        tracing::info!(
            "compiled {} definition(s) into {} message(s) with {} error(s)",
            definitions.len(),
            codecs.len(),
            errors.len()
        );

        CompileReport {
            codecs,
            identifiers,
            errors,
        }
    }

    /// Parses and compiles a batch of JSON schema documents.
    ///
    /// `origin` names a document in its parse errors, usually its path.
    /// A document that is not valid JSON contributes one parse error. Packets
    /// with schema errors contribute those errors while the rest of their
    /// document still compiles.
    pub fn compile_sources<I, O, S>(&self, sources: I) -> CompileReport
    where
        I: IntoIterator<Item = (O, S)>,
        O: Into<String>,
        S: AsRef<str>,
    {
        let mut set = SchemaSet::new();
        let mut errors = Vec::new();

        for (origin, json) in sources {
            match parse_schema_partial(json.as_ref()) {
                Ok((document, schema_errors)) => {
                    errors.extend(schema_errors.into_iter().map(CompileError::Schema));
                    set.push_document(document);
                }
                Err(source) => errors.push(CompileError::Parse {
                    origin: origin.into(),
                    source,
                }),
            }
        }

        for error in &errors {
            tracing::warn!("{error}");
        }

        let mut report = self.compile(set);
        errors.append(&mut report.errors);
        report.errors = errors;
        report
    }

    /// Runs one definition's pipeline.
    pub fn compile_message(&self, def: &MessageDefinition) -> (Vec<CodecSpec>, Vec<CompileError>) {
        if let Err(schema_errors) = cangen_schema::validate_definition(def) {
            return (
                Vec::new(),
                schema_errors.into_iter().map(CompileError::Schema).collect(),
            );
        }

        let mut codecs = Vec::new();
        let mut errors = Vec::new();

        for member in expand(def.clone()) {
            let codec = cangen_schema::compile(&member)
                .map_err(CompileError::from)
                .and_then(|layout| {
                    CodecSpec::derive(&layout, self.float_order).map_err(CompileError::from)
                });

            match codec {
                Ok(codec) => {
                    tracing::debug!(
                        "compiled '{}' ({:#05x}, {} byte(s))",
                        codec.name,
                        codec.identifier,
                        codec.dlc
                    );
                    codecs.push(codec);
                }
                Err(error) => errors.push(error),
            }
        }

        (codecs, errors)
    }

    /// Fans definitions out over the worker pool and restores their order.
    fn run(&self, definitions: &[MessageDefinition]) -> Vec<MessageOutcome> {
        let workers = self.workers.min(definitions.len());
        if workers <= 1 {
            return definitions
                .iter()
                .map(|def| self.compile_message(def))
                .collect();
        }

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &MessageDefinition)>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, MessageOutcome)>();

        for job in definitions.iter().enumerate() {
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);

        thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for (index, def) in job_rx.iter() {
                        if result_tx.send((index, self.compile_message(def))).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);

        let mut slots: Vec<Option<MessageOutcome>> =
            (0..definitions.len()).map(|_| None).collect();
        for (index, outcome) in result_rx.try_iter() {
            slots[index] = Some(outcome);
        }
        slots.into_iter().flatten().collect()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        CompilerBuilder::new().build()
    }
}

/// Result of compiling a batch: everything that compiled plus every error.
#[derive(Debug, Default)]
pub struct CompileReport {
    /// Codecs of every message that compiled, in batch order.
    pub codecs: Vec<CodecSpec>,
    /// Identifier enumeration of the compiled messages.
    pub identifiers: IdentifierEnum,
    /// Every error found in the batch.
    pub errors: Vec<CompileError>,
}

impl CompileReport {
    /// Returns true if the batch compiled without errors.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts the report into a compiled set, or its errors.
    ///
    /// # Errors
    /// Returns every collected error if there was at least one.
    pub fn into_result(self) -> Result<CompiledSet, Vec<CompileError>> {
        if self.errors.is_empty() {
            Ok(CompiledSet {
                codecs: self.codecs,
                identifiers: self.identifiers,
            })
        } else {
            Err(self.errors)
        }
    }
}

/// An error-free compiled batch, ready for emission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledSet {
    /// Codecs in batch order.
    pub codecs: Vec<CodecSpec>,
    /// Identifier enumeration.
    pub identifiers: IdentifierEnum,
}

impl CompiledSet {
    /// Looks up a codec by message name.
    #[must_use]
    pub fn codec(&self, name: &str) -> Option<&CodecSpec> {
        self.codecs.iter().find(|c| c.name == name)
    }
}

impl TryFrom<CompileReport> for CompiledSet {
    type Error = CodegenError;

    fn try_from(report: CompileReport) -> Result<Self, Self::Error> {
        report.into_result().map_err(CodegenError::Compile)
    }
}
