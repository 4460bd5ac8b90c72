//! Envelope to value graph, on an explicit work-stack.
//!
//! Mirrors the flattener: each composite envelope pushes a build step and
//! then one visit per child, and the build step pops the hydrated children.

use std::sync::Arc;

use tagmarsh_foundation::{
    Error, ErrorContext, ErrorKind, Instance, Moment, Pair, Phase, Result, Tag, Throwable,
    ThrowableKind, TmCollection, TmMap, TmSet, TmVec, Value,
};
use tagmarsh_registry::{MarshDescriptor, MarshRegistry};
use tracing::trace;

use crate::config::MarshalConfig;
use crate::envelope::{Envelope, KEYS_FIELD, TYPE_FIELD, VALUE_FIELD, VALUES_FIELD};
use crate::flatten::THROWABLE_MAP_FIELD;
use crate::path::Path;

enum Task<'e, 'r> {
    Visit {
        envelope: &'e Envelope,
        path: Path,
        depth: usize,
    },
    Build {
        build: Build<'e, 'r>,
        path: Path,
    },
}

enum Build<'e, 'r> {
    Array(usize),
    Record(Vec<&'e str>),
    Sequence { tag: Tag<'e>, len: usize },
    Map(usize),
    Pair,
    Throwable(ThrowableFrame<'e>),
    Registered(&'r MarshDescriptor),
}

struct ThrowableFrame<'e> {
    kind: ThrowableKind,
    type_name: &'e str,
    message: &'e str,
    stack: &'e str,
    causes: usize,
    mapped: bool,
}

/// Hydrates one envelope tree against a registry snapshot.
pub(crate) struct Hydrator<'a, 'e, R: ?Sized> {
    registry: &'a R,
    config: &'a MarshalConfig,
    tasks: Vec<Task<'e, 'a>>,
    output: Vec<Value>,
}

impl<'a, 'e, R: MarshRegistry + ?Sized> Hydrator<'a, 'e, R> {
    pub(crate) fn new(registry: &'a R, config: &'a MarshalConfig) -> Self {
        Self {
            registry,
            config,
            tasks: Vec::new(),
            output: Vec::new(),
        }
    }

    pub(crate) fn run(mut self, envelope: &'e Envelope) -> Result<Value> {
        self.tasks.push(Task::Visit {
            envelope,
            path: Path::root(),
            depth: 0,
        });

        while let Some(task) = self.tasks.pop() {
            match task {
                Task::Visit {
                    envelope,
                    path,
                    depth,
                } => {
                    self.visit(envelope, &path, depth).map_err(|e| locate(e, &path))?;
                }
                Task::Build { build, path } => {
                    let value = self.build(build).map_err(|e| locate(e, &path))?;
                    self.output.push(value);
                }
            }
        }

        match (self.output.pop(), self.output.is_empty()) {
            (Some(value), true) => Ok(value),
            _ => Err(Error::new(ErrorKind::Internal(
                "hydrate left an unbalanced output stack".to_string(),
            ))),
        }
    }

    fn visit(&mut self, envelope: &'e Envelope, path: &Path, depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(Error::stack_depth_exceeded(self.config.max_depth));
        }
        let child = depth + 1;

        match envelope {
            Envelope::Bool(b) => self.output.push(Value::Bool(*b)),
            Envelope::Int(n) => self.output.push(Value::Int(*n)),
            Envelope::Float(n) => self.output.push(Value::Float(*n)),
            Envelope::String(s) => self.output.push(Value::from(s.as_str())),
            Envelope::Array(items) => {
                self.push_build(Build::Array(items.len()), path);
                self.push_items(items, path, child);
            }
            Envelope::Record(_) if envelope.is_tagged() => self.visit_tagged(envelope, path, child)?,
            Envelope::Record(record) => {
                self.push_build(Build::Record(record.keys().map(String::as_str).collect()), path);
                for (key, member) in record.iter().rev() {
                    self.push_visit(member, path.field(key.as_str()), child);
                }
            }
            Envelope::Null => {
                return Err(Error::malformed_envelope(
                    "bare null; null is always written as a tagged envelope",
                ));
            }
        }
        Ok(())
    }

    fn visit_tagged(&mut self, envelope: &'e Envelope, path: &Path, depth: usize) -> Result<()> {
        let name = envelope
            .field(TYPE_FIELD)
            .and_then(Envelope::as_str)
            .ok_or_else(|| Error::malformed_envelope("tagged envelope without a string `type`"))?;
        let tag = Tag::parse(name);
        trace!(%tag, %path, "hydrating tagged envelope");

        match tag {
            Tag::Null => self.output.push(Value::Null),
            Tag::Undefined => self.output.push(Value::Undefined),
            Tag::Date => {
                let text = require(envelope, VALUE_FIELD, name)?
                    .as_str()
                    .ok_or_else(|| Error::malformed_envelope("date value is not a string"))?;
                let moment = self.parse_moment(text)?;
                self.output.push(Value::Moment(moment));
            }
            Tag::Collection | Tag::List | Tag::Set => {
                let items = require_array(envelope, VALUE_FIELD, name)?;
                self.push_build(
                    Build::Sequence {
                        tag,
                        len: items.len(),
                    },
                    path,
                );
                self.push_items(items, &path.field(VALUE_FIELD), depth);
            }
            Tag::Map => self.push_map(envelope, path, depth)?,
            Tag::Pair => {
                let payload = require(envelope, VALUE_FIELD, name)?;
                let value_path = path.field(VALUE_FIELD);
                let a = require(payload, "a", name)?;
                let b = require(payload, "b", name)?;
                self.push_build(Build::Pair, path);
                self.push_visit(b, value_path.field("b"), depth);
                self.push_visit(a, value_path.field("a"), depth);
            }
            Tag::Throwable(kind) => self.push_throwable(kind, envelope, path, depth)?,
            Tag::Registered(type_name) => {
                let registry = self.registry;
                let descriptor = registry
                    .lookup_by_name(type_name)
                    .ok_or_else(|| Error::unregistered_type(type_name))?;
                let payload = require(envelope, VALUE_FIELD, name)?;
                let value_path = path.field(VALUE_FIELD);

                let mut fields = Vec::with_capacity(descriptor.properties().len());
                for property in descriptor.properties() {
                    let field = payload.field(property.name()).ok_or_else(|| {
                        Error::malformed_envelope(format!(
                            "{type_name} envelope is missing property `{}`",
                            property.name()
                        ))
                    })?;
                    fields.push((property.name(), field));
                }

                self.push_build(Build::Registered(descriptor), path);
                for (property, field) in fields.into_iter().rev() {
                    self.push_visit(field, value_path.field(property), depth);
                }
            }
        }
        Ok(())
    }

    fn push_map(&mut self, envelope: &'e Envelope, path: &Path, depth: usize) -> Result<()> {
        let keys = require_array(envelope, KEYS_FIELD, "Map")?;
        let values = require_array(envelope, VALUES_FIELD, "Map")?;
        if keys.len() != values.len() {
            return Err(Error::malformed_envelope(format!(
                "Map has {} keys but {} values",
                keys.len(),
                values.len()
            )));
        }

        let keys_path = path.field(KEYS_FIELD);
        let values_path = path.field(VALUES_FIELD);
        self.push_build(Build::Map(keys.len()), path);
        for (i, (key, value)) in keys.iter().zip(values).enumerate().rev() {
            self.push_visit(value, values_path.index(i), depth);
            self.push_visit(key, keys_path.index(i), depth);
        }
        Ok(())
    }

    fn push_throwable(
        &mut self,
        kind: ThrowableKind,
        envelope: &'e Envelope,
        path: &Path,
        depth: usize,
    ) -> Result<()> {
        let tag = kind.tag();
        let payload = require(envelope, VALUE_FIELD, tag)?;
        let type_name = require_str(payload, "type", tag)?;
        let message = require_str(payload, "message", tag)?;
        // Hosts drop an absent stack when encoding, so it is optional here.
        let stack = match payload.field("stack") {
            None => "",
            Some(stack) => stack
                .as_str()
                .ok_or_else(|| Error::malformed_envelope(format!("{tag} `stack` is not a string")))?,
        };
        let data = require(payload, "data", tag)?;
        let causes = require_array(payload, "causes", tag)?;
        let map = if kind == ThrowableKind::Mapped {
            Some(require(payload, THROWABLE_MAP_FIELD, tag)?)
        } else {
            None
        };

        self.push_build(
            Build::Throwable(ThrowableFrame {
                kind,
                type_name,
                message,
                stack,
                causes: causes.len(),
                mapped: map.is_some(),
            }),
            path,
        );

        // Pops as: data, causes in order, then the cause map.
        let value_path = path.field(VALUE_FIELD);
        if let Some(map) = map {
            self.push_visit(map, value_path.field(THROWABLE_MAP_FIELD), depth);
        }
        self.push_items(causes, &value_path.field("causes"), depth);
        self.push_visit(data, value_path.field("data"), depth);
        Ok(())
    }

    fn push_visit(&mut self, envelope: &'e Envelope, path: Path, depth: usize) {
        self.tasks.push(Task::Visit {
            envelope,
            path,
            depth,
        });
    }

    fn push_build(&mut self, build: Build<'e, 'a>, path: &Path) {
        self.tasks.push(Task::Build {
            build,
            path: path.clone(),
        });
    }

    fn push_items(&mut self, items: &'e [Envelope], path: &Path, depth: usize) {
        for (i, item) in items.iter().enumerate().rev() {
            self.push_visit(item, path.index(i), depth);
        }
    }

    fn parse_moment(&self, text: &str) -> Result<Moment> {
        if self.config.lenient_moments {
            Moment::parse(text)
        } else {
            Moment::parse_as(text, self.config.moment_format)
        }
    }

    fn pop_n(&mut self, n: usize) -> Result<Vec<Value>> {
        let at = self.output.len().checked_sub(n).ok_or_else(|| {
            Error::new(ErrorKind::Internal(format!(
                "hydrate expected {n} values, found {}",
                self.output.len()
            )))
        })?;
        Ok(self.output.split_off(at))
    }

    fn pop_one(&mut self) -> Result<Value> {
        self.output
            .pop()
            .ok_or_else(|| Error::new(ErrorKind::Internal("hydrate output stack is empty".to_string())))
    }

    fn build(&mut self, build: Build<'e, 'a>) -> Result<Value> {
        let value = match build {
            Build::Array(len) => Value::Array(self.pop_n(len)?.into_iter().collect()),
            Build::Record(keys) => {
                let members = self.pop_n(keys.len())?;
                Value::Record(keys.into_iter().zip(members).collect())
            }
            Build::Sequence { tag, len } => {
                let members = self.pop_n(len)?;
                match tag {
                    Tag::Collection => Value::Collection(members.into_iter().collect::<TmCollection<_>>()),
                    Tag::Set => Value::Set(members.into_iter().collect::<TmSet<_>>()),
                    _ => Value::List(members.into_iter().collect::<TmVec<_>>()),
                }
            }
            Build::Map(len) => Value::Map(interleaved_map(self.pop_n(len * 2)?)),
            Build::Pair => {
                let b = self.pop_one()?;
                let a = self.pop_one()?;
                Value::Pair(Pair::new(a, b))
            }
            Build::Throwable(frame) => self.build_throwable(&frame)?,
            Build::Registered(descriptor) => {
                let values = self.pop_n(descriptor.properties().len())?;
                Value::Object(assign_properties(descriptor, values)?)
            }
        };
        Ok(value)
    }

    fn build_throwable(&mut self, frame: &ThrowableFrame<'e>) -> Result<Value> {
        let cause_map = if frame.mapped {
            match self.pop_one()? {
                Value::Map(map) => Some(map),
                other => {
                    return Err(Error::malformed_envelope(format!(
                        "`{THROWABLE_MAP_FIELD}` hydrated to {}, not a map",
                        other.kind_name()
                    )));
                }
            }
        } else {
            None
        };
        let causes = self.pop_n(frame.causes)?;
        let data = self.pop_one()?;

        let throwable = match cause_map {
            Some(map) => Throwable::mapped(frame.type_name, map),
            None => Throwable::new(frame.kind, frame.type_name, ""),
        }
        .with_message(frame.message)
        .with_data(data)
        .with_stack(frame.stack)
        .with_causes(causes);

        Ok(Value::Throwable(Arc::new(throwable)))
    }
}

/// Builds a bare instance and writes each property through its setter or
/// directly as a field.
fn assign_properties(descriptor: &MarshDescriptor, values: Vec<Value>) -> Result<Instance> {
    let mut object = descriptor.construct();
    for (property, value) in descriptor.properties().iter().zip(values) {
        match property.setter_name() {
            Some(setter) => object.call_setter(setter, value).map_err(|e| {
                Error::accessor_failed(descriptor.type_name(), setter, e.to_string())
            })?,
            None => object.write_field(property.name(), value).map_err(|e| {
                Error::accessor_failed(descriptor.type_name(), property.name(), e.to_string())
            })?,
        }
    }
    Ok(Instance::from_boxed(object))
}

/// Pairs up interleaved `k0, v0, k1, v1, ...` values in order.
fn interleaved_map(entries: Vec<Value>) -> TmMap<Value, Value> {
    let mut map = TmMap::new();
    let mut entries = entries.into_iter();
    while let (Some(key), Some(value)) = (entries.next(), entries.next()) {
        map = map.insert(key, value);
    }
    map
}

fn require<'e>(envelope: &'e Envelope, field: &str, kind: &str) -> Result<&'e Envelope> {
    envelope
        .field(field)
        .ok_or_else(|| Error::malformed_envelope(format!("{kind} envelope is missing `{field}`")))
}

fn require_str<'e>(envelope: &'e Envelope, field: &str, kind: &str) -> Result<&'e str> {
    require(envelope, field, kind)?
        .as_str()
        .ok_or_else(|| Error::malformed_envelope(format!("{kind} `{field}` is not a string")))
}

fn require_array<'e>(envelope: &'e Envelope, field: &str, kind: &str) -> Result<&'e [Envelope]> {
    require(envelope, field, kind)?
        .as_array()
        .ok_or_else(|| Error::malformed_envelope(format!("{kind} `{field}` is not an array")))
}

fn locate(error: Error, path: &Path) -> Error {
    if error.context.is_some() {
        return error;
    }
    error.with_context(
        ErrorContext::new()
            .with_phase(Phase::Hydrate)
            .with_path(path.to_string()),
    )
}
