//! Value graph to envelope, on an explicit work-stack.
//!
//! Every composite value pushes a build step followed by a visit for each
//! child. Children leave their envelopes on the output stack in order, and
//! the build step pops exactly as many as it pushed.

use std::collections::BTreeMap;
use std::sync::Arc;

use tagmarsh_foundation::{
    Error, ErrorContext, ErrorKind, MarshObject, Phase, Result, Tag, Throwable, ThrowableKind,
    Value,
};
use tagmarsh_registry::{MarshDescriptor, MarshRegistry};
use tracing::trace;

use crate::classify::{Shape, classify};
use crate::config::MarshalConfig;
use crate::envelope::{Envelope, KEYS_FIELD, MARKER_FIELD, VALUE_FIELD, VALUES_FIELD};
use crate::path::Path;

/// Throwable payload field holding the cause map.
pub(crate) const THROWABLE_MAP_FIELD: &str = "throwableMap";

enum Task {
    Visit { value: Value, path: Path, depth: usize },
    Build(Build),
}

enum Build {
    Array(usize),
    Record(Vec<Arc<str>>),
    Sequence { tag: Tag<'static>, len: usize },
    Map(usize),
    Pair,
    Throwable(ThrowableFrame),
    Registered { type_name: String, properties: Vec<String> },
}

struct ThrowableFrame {
    kind: ThrowableKind,
    type_name: String,
    message: String,
    stack: String,
    causes: usize,
    map_len: Option<usize>,
}

/// Flattens one value graph against a registry snapshot.
pub(crate) struct Flattener<'a, R: ?Sized> {
    registry: &'a R,
    config: &'a MarshalConfig,
    tasks: Vec<Task>,
    output: Vec<Envelope>,
}

impl<'a, R: MarshRegistry + ?Sized> Flattener<'a, R> {
    pub(crate) fn new(registry: &'a R, config: &'a MarshalConfig) -> Self {
        Self {
            registry,
            config,
            tasks: Vec::new(),
            output: Vec::new(),
        }
    }

    pub(crate) fn run(mut self, value: &Value) -> Result<Envelope> {
        self.tasks.push(Task::Visit {
            value: value.clone(),
            path: Path::root(),
            depth: 0,
        });

        while let Some(task) = self.tasks.pop() {
            match task {
                Task::Visit { value, path, depth } => {
                    self.visit(&value, &path, depth).map_err(|e| locate(e, &path))?;
                }
                Task::Build(build) => {
                    let envelope = self.build(build)?;
                    self.output.push(envelope);
                }
            }
        }

        match (self.output.pop(), self.output.is_empty()) {
            (Some(envelope), true) => Ok(envelope),
            _ => Err(Error::new(ErrorKind::Internal(
                "flatten left an unbalanced output stack".to_string(),
            ))),
        }
    }

    fn visit(&mut self, value: &Value, path: &Path, depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(Error::stack_depth_exceeded(self.config.max_depth));
        }
        let child = depth + 1;

        match classify(value, self.registry) {
            Shape::Registered(instance, descriptor) => {
                let properties = read_properties(instance.object(), descriptor)?;
                let value_path = path.field(VALUE_FIELD);
                self.tasks.push(Task::Build(Build::Registered {
                    type_name: descriptor.type_name().to_string(),
                    properties: properties.iter().map(|(name, _)| name.clone()).collect(),
                }));
                for (name, property) in properties.into_iter().rev() {
                    self.push_visit(property, value_path.field(name.as_str()), child);
                }
            }
            Shape::Set(members) => {
                self.push_sequence(Tag::Set, members.iter(), members.len(), path, child);
            }
            Shape::Pair(pair) => {
                let value_path = path.field(VALUE_FIELD);
                self.tasks.push(Task::Build(Build::Pair));
                self.push_visit(pair.b().clone(), value_path.field("b"), child);
                self.push_visit(pair.a().clone(), value_path.field("a"), child);
            }
            Shape::List(members) => {
                self.push_sequence(Tag::List, members.iter(), members.len(), path, child);
            }
            Shape::Map(map) => {
                self.tasks.push(Task::Build(Build::Map(map.len())));
                self.push_entries(map.iter(), map.len(), path, child);
            }
            Shape::Collection(members) => {
                self.push_sequence(Tag::Collection, members.iter(), members.len(), path, child);
            }
            Shape::Throwable(throwable) => self.push_throwable(throwable, path, child)?,
            Shape::Record(record) => {
                if record.get(MARKER_FIELD) == Some(&Value::Bool(true)) {
                    return Err(Error::unsupported_value(format!(
                        "record field `{MARKER_FIELD}: true` would read back as a tagged envelope"
                    )));
                }
                let keys: Vec<Arc<str>> = record.keys().cloned().collect();
                self.tasks.push(Task::Build(Build::Record(keys)));
                for (key, member) in record.iter().rev() {
                    self.push_visit(member.clone(), path.field(Arc::clone(key)), child);
                }
            }
            Shape::Array(items) => {
                self.tasks.push(Task::Build(Build::Array(items.len())));
                let mut index = items.len();
                for item in items.iter().rev() {
                    index -= 1;
                    self.push_visit(item.clone(), path.index(index), child);
                }
            }
            Shape::Moment(moment) => {
                trace!(%path, "flattened date");
                self.output.push(Envelope::tagged_value(
                    Tag::Date.name(),
                    Envelope::String(moment.format(self.config.moment_format)),
                ));
            }
            Shape::Primitive(primitive) => self.output.push(primitive_envelope(primitive)?),
            Shape::Null => self.output.push(Envelope::tagged(Tag::Null.name(), [])),
            Shape::Undefined => self.output.push(Envelope::tagged(Tag::Undefined.name(), [])),
            Shape::Unrecognized(other) => return Err(unsupported(other)),
        }
        Ok(())
    }

    fn push_visit(&mut self, value: Value, path: Path, depth: usize) {
        self.tasks.push(Task::Visit { value, path, depth });
    }

    fn push_sequence<'v, I>(&mut self, tag: Tag<'static>, members: I, len: usize, path: &Path, depth: usize)
    where
        I: DoubleEndedIterator<Item = &'v Value>,
    {
        let value_path = path.field(VALUE_FIELD);
        self.tasks.push(Task::Build(Build::Sequence { tag, len }));
        // Visits pop in reverse push order, so push from the back.
        let mut index = len;
        for member in members.rev() {
            index -= 1;
            self.push_visit(member.clone(), value_path.index(index), depth);
        }
    }

    /// Pushes key and value visits so they pop interleaved as k0, v0, k1, v1.
    fn push_entries<'v, I>(&mut self, entries: I, len: usize, path: &Path, depth: usize)
    where
        I: DoubleEndedIterator<Item = (&'v Value, &'v Value)>,
    {
        let keys_path = path.field(KEYS_FIELD);
        let values_path = path.field(VALUES_FIELD);
        let mut index = len;
        for (key, value) in entries.rev() {
            index -= 1;
            self.push_visit(value.clone(), values_path.index(index), depth);
            self.push_visit(key.clone(), keys_path.index(index), depth);
        }
    }

    fn push_throwable(&mut self, throwable: &Throwable, path: &Path, depth: usize) -> Result<()> {
        let value_path = path.field(VALUE_FIELD);
        let map = throwable.cause_map();
        let map_path = value_path.field(THROWABLE_MAP_FIELD);
        // The cause map is its own Map envelope, one level below the payload.
        if map.is_some() && depth > self.config.max_depth {
            return Err(locate(Error::stack_depth_exceeded(self.config.max_depth), &map_path));
        }
        self.tasks.push(Task::Build(Build::Throwable(ThrowableFrame {
            kind: throwable.kind(),
            type_name: throwable.type_name().to_string(),
            message: throwable.message().to_string(),
            stack: throwable.stack().to_string(),
            causes: throwable.causes().len(),
            map_len: map.map(|m| m.len()),
        })));

        // Pops as: data, causes in order, then map entries.
        if let Some(map) = map {
            self.push_entries(map.iter(), map.len(), &map_path, depth + 1);
        }
        let causes_path = value_path.field("causes");
        for (i, cause) in throwable.causes().iter().enumerate().rev() {
            self.push_visit(cause.clone(), causes_path.index(i), depth);
        }
        self.push_visit(throwable.data().clone(), value_path.field("data"), depth);
        Ok(())
    }

    fn pop_n(&mut self, n: usize) -> Result<Vec<Envelope>> {
        let at = self.output.len().checked_sub(n).ok_or_else(|| {
            Error::new(ErrorKind::Internal(format!(
                "flatten expected {n} envelopes, found {}",
                self.output.len()
            )))
        })?;
        Ok(self.output.split_off(at))
    }

    fn build(&mut self, build: Build) -> Result<Envelope> {
        let envelope = match build {
            Build::Array(len) => Envelope::Array(self.pop_n(len)?),
            Build::Record(keys) => {
                let values = self.pop_n(keys.len())?;
                Envelope::Record(keys.iter().map(|k| k.to_string()).zip(values).collect())
            }
            Build::Sequence { tag, len } => {
                trace!(tag = tag.name(), len, "flattened sequence");
                Envelope::tagged_value(tag.name(), Envelope::Array(self.pop_n(len)?))
            }
            Build::Map(len) => {
                let entries = self.pop_n(len * 2)?;
                trace!(len, "flattened map");
                map_envelope(entries)
            }
            Build::Pair => {
                let mut parts = self.pop_n(2)?.into_iter();
                let mut payload = BTreeMap::new();
                if let (Some(a), Some(b)) = (parts.next(), parts.next()) {
                    payload.insert("a".to_string(), a);
                    payload.insert("b".to_string(), b);
                }
                Envelope::tagged_value(Tag::Pair.name(), Envelope::Record(payload))
            }
            Build::Throwable(frame) => self.build_throwable(frame)?,
            Build::Registered {
                type_name,
                properties,
            } => {
                let values = self.pop_n(properties.len())?;
                trace!(type_name = %type_name, "flattened registered object");
                Envelope::tagged_value(
                    &type_name,
                    Envelope::Record(properties.into_iter().zip(values).collect()),
                )
            }
        };
        Ok(envelope)
    }

    fn build_throwable(&mut self, frame: ThrowableFrame) -> Result<Envelope> {
        let map_entries = match frame.map_len {
            Some(len) => Some(self.pop_n(len * 2)?),
            None => None,
        };
        let causes = self.pop_n(frame.causes)?;
        let data = self.pop_n(1)?.into_iter().next().unwrap_or(Envelope::Null);

        let mut payload = BTreeMap::new();
        payload.insert("type".to_string(), Envelope::String(frame.type_name));
        payload.insert("data".to_string(), data);
        payload.insert("message".to_string(), Envelope::String(frame.message));
        payload.insert("stack".to_string(), Envelope::String(frame.stack));
        payload.insert("causes".to_string(), Envelope::Array(causes));
        if let Some(entries) = map_entries {
            payload.insert(THROWABLE_MAP_FIELD.to_string(), map_envelope(entries));
        }

        trace!(kind = frame.kind.tag(), "flattened throwable");
        Ok(Envelope::tagged_value(
            Tag::Throwable(frame.kind).name(),
            Envelope::Record(payload),
        ))
    }
}

/// Reads each described property through its getter or as a direct field.
fn read_properties(
    object: &dyn MarshObject,
    descriptor: &MarshDescriptor,
) -> Result<Vec<(String, Value)>> {
    descriptor
        .properties()
        .iter()
        .map(|property| {
            let value = match property.getter_name() {
                Some(getter) => object.call_getter(getter).map_err(|e| {
                    Error::accessor_failed(descriptor.type_name(), getter, e.to_string())
                })?,
                None => object.read_field(property.name()).map_err(|e| {
                    Error::accessor_failed(descriptor.type_name(), property.name(), e.to_string())
                })?,
            };
            Ok((property.name().to_string(), value))
        })
        .collect()
}

/// Splits interleaved `k0, v0, k1, v1, ...` envelopes into a map envelope.
fn map_envelope(entries: Vec<Envelope>) -> Envelope {
    let mut keys = Vec::with_capacity(entries.len() / 2);
    let mut values = Vec::with_capacity(entries.len() / 2);
    let mut entries = entries.into_iter();
    while let (Some(key), Some(value)) = (entries.next(), entries.next()) {
        keys.push(key);
        values.push(value);
    }
    Envelope::tagged(
        Tag::Map.name(),
        [(KEYS_FIELD, Envelope::Array(keys)), (VALUES_FIELD, Envelope::Array(values))],
    )
}

fn primitive_envelope(value: &Value) -> Result<Envelope> {
    match value {
        Value::Bool(b) => Ok(Envelope::Bool(*b)),
        Value::Int(n) => Ok(Envelope::Int(*n)),
        Value::Float(n) => Ok(Envelope::Float(*n)),
        Value::String(s) => Ok(Envelope::String(s.to_string())),
        other => Err(unsupported(other)),
    }
}

fn unsupported(value: &Value) -> Error {
    match value {
        Value::Fn(func) => Error::unsupported_value(format!("function `{}`", func.name)),
        Value::Object(instance) => {
            Error::unsupported_value(format!("unregistered object {instance:?}"))
        }
        Value::Float(n) => Error::unsupported_value(format!("non-finite float {n}")),
        other => Error::unsupported_value(other.kind_name()),
    }
}

fn locate(error: Error, path: &Path) -> Error {
    if error.context.is_some() {
        return error;
    }
    error.with_context(
        ErrorContext::new()
            .with_phase(Phase::Flatten)
            .with_path(path.to_string()),
    )
}
