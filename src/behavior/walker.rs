//! Walks behavior documents into the symbol graph.
//!
//! A behavior node is a map with an identity (`behaviorID`, or
//! `behaviorName` for embedded nodes) and a class. Its fields are handled
//! in four passes, each in document order:
//!
//! 1. trigger fields: a method symbol `Node.key`, with a usage reference to
//!    every string found anywhere under the value
//! 2. sub-behavior fields: a method symbol with a call reference to the
//!    named behavior, or to an embedded node walked recursively
//! 3. condition fields: a function symbol, linked to the clause types and
//!    string operands of its condition tree
//! 4. everything else: a field symbol, with a usage reference to a string
//!    value. Nested maps and lists of unclassified fields are not expanded.
//!
//! A key with several roles goes through each of its passes. The field
//! symbol keeps the kind given by the first pass.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::graph::{FileId, GraphBuilder, GraphStore, ReferenceKind, SymbolId, SymbolKind};
use crate::parser::{Document, KeyedToken, Token, TokenMap, Value};

use super::error::ExtractError;
use super::schema::{BehaviorSchema, FieldRole};

const FIELD_PASSES: [FieldRole; 4] = [
    FieldRole::Trigger,
    FieldRole::SubBehavior,
    FieldRole::Condition,
    FieldRole::Plain,
];

/// Where the node being walked lives
struct Source<'d> {
    file: FileId,
    document: &'d Document,
}

impl Source<'_> {
    fn span(&self, token: &Token) -> crate::base::Span {
        self.document.span(token)
    }

    fn line(&self, token: &Token) -> u32 {
        self.span(token).start.line
    }
}

/// Behavior walker for one indexing run.
///
/// The walker remembers which classes it has linked to the root class, so
/// one walker should see every document of a run.
pub struct BehaviorWalker<'b, S: GraphStore> {
    builder: &'b mut GraphBuilder<S>,
    schema: &'b BehaviorSchema,
    root_class: Option<SymbolId>,
    classes: FxHashMap<SmolStr, SymbolId>,
}

impl<'b, S: GraphStore> BehaviorWalker<'b, S> {
    pub fn new(builder: &'b mut GraphBuilder<S>, schema: &'b BehaviorSchema) -> Self {
        Self {
            builder,
            schema,
            root_class: None,
            classes: FxHashMap::default(),
        }
    }

    /// Walk the behavior node at the root of `document`, read from `path`.
    /// Returns the node's symbol id.
    pub fn walk_document(&mut self, path: &str, document: &Document) -> Result<SymbolId, ExtractError> {
        let Some(node) = document.root_map() else {
            return Err(ExtractError::NotANode {
                found: document.root.value.kind_name(),
            });
        };
        let file = self.builder.intern_file(path, &self.schema.language)?;
        let source = Source { file, document };
        self.walk_node(&source, node)
    }

    fn walk_node(&mut self, source: &Source<'_>, node: &TokenMap) -> Result<SymbolId, ExtractError> {
        let schema = self.schema;
        let (name, id_token) = self.identity(source, node)?;
        debug!(node = name, "walking behavior node");

        let node_id = self.builder.intern_symbol(name, SymbolKind::GlobalVariable)?;
        self.builder.attach_location(node_id, source.file, source.span(id_token))?;

        let Some(class) = node.get(&schema.class_key) else {
            return Err(ExtractError::MissingField {
                node: name.to_string(),
                key: schema.class_key.clone(),
            });
        };
        let Some(class_name) = class.token.as_str() else {
            return Err(invalid_field(source, name, &schema.class_key, &class.token, "a string"));
        };
        let class_id = self.category(class_name)?;
        let reference = self.builder.add_reference(node_id, class_id, ReferenceKind::TypeUsage)?;
        self.builder.attach_location(reference, source.file, source.span(&class.token))?;

        for pass in FIELD_PASSES {
            for (key, entry) in node {
                if !schema.has_role(key, pass) {
                    continue;
                }
                match pass {
                    FieldRole::Trigger => self.trigger_field(source, name, key, entry)?,
                    FieldRole::SubBehavior => self.sub_behavior_field(source, name, key, entry)?,
                    FieldRole::Condition => self.condition_field(source, name, key, entry)?,
                    _ => self.plain_field(source, name, key, entry)?,
                }
            }
        }

        Ok(node_id)
    }

    /// Node name and the token it came from
    fn identity<'n>(
        &self,
        source: &Source<'_>,
        node: &'n TokenMap,
    ) -> Result<(&'n str, &'n Token), ExtractError> {
        let schema = self.schema;
        let Some((key, entry)) = node
            .get_key_value(&schema.id_key)
            .or_else(|| node.get_key_value(&schema.name_key))
        else {
            let line = node
                .values()
                .next()
                .map(|entry| source.line(&entry.key))
                .unwrap_or(1);
            return Err(ExtractError::MissingIdentity {
                id_key: schema.id_key.clone(),
                name_key: schema.name_key.clone(),
                line,
            });
        };
        match entry.token.as_str() {
            Some(name) => Ok((name, &entry.token)),
            None => Err(invalid_field(source, "<unnamed>", key, &entry.token, "a string")),
        }
    }

    /// Class symbol for `class_name`, linked to the root class on first use
    fn category(&mut self, class_name: &str) -> Result<SymbolId, ExtractError> {
        if let Some(&id) = self.classes.get(class_name) {
            return Ok(id);
        }
        let root = match self.root_class {
            Some(id) => id,
            None => {
                let id = self
                    .builder
                    .intern_symbol(&self.schema.root_class, SymbolKind::Class)?;
                self.root_class = Some(id);
                id
            }
        };
        let class_id = self.builder.intern_symbol(class_name, SymbolKind::Class)?;
        if class_id != root {
            self.builder.add_reference(class_id, root, ReferenceKind::Inheritance)?;
        }
        self.classes.insert(SmolStr::new(class_name), class_id);
        Ok(class_id)
    }

    /// Field symbol `node.key`, located at the key
    fn field_symbol(
        &mut self,
        source: &Source<'_>,
        node: &str,
        key: &str,
        entry: &KeyedToken,
        kind: SymbolKind,
    ) -> Result<SymbolId, ExtractError> {
        let field = self
            .builder
            .intern_decorated_symbol(&format!("{node}.{key}"), kind, node, "")?;
        self.builder.attach_location(field, source.file, source.span(&entry.key))?;
        Ok(field)
    }

    /// Reference from `owner` to the symbol named `target`, located at `token`
    fn link(
        &mut self,
        source: &Source<'_>,
        owner: SymbolId,
        target: &str,
        target_kind: SymbolKind,
        kind: ReferenceKind,
        token: &Token,
    ) -> Result<(), ExtractError> {
        if target.trim().is_empty() {
            trace!(line = source.line(token), "skipping blank reference target");
            return Ok(());
        }
        let target = self.builder.intern_symbol(target, target_kind)?;
        let reference = self.builder.add_reference(owner, target, kind)?;
        self.builder.attach_location(reference, source.file, source.span(token))?;
        Ok(())
    }

    fn trigger_field(
        &mut self,
        source: &Source<'_>,
        node: &str,
        key: &str,
        entry: &KeyedToken,
    ) -> Result<(), ExtractError> {
        let field = self.field_symbol(source, node, key, entry, SymbolKind::Method)?;
        self.mark_usage(source, field, &entry.token)
    }

    /// Usage references to every string under `token`
    fn mark_usage(&mut self, source: &Source<'_>, field: SymbolId, token: &Token) -> Result<(), ExtractError> {
        match &token.value {
            Value::String(target) => self.link(
                source,
                field,
                target,
                SymbolKind::GlobalVariable,
                ReferenceKind::Usage,
                token,
            ),
            Value::List(items) => items
                .iter()
                .try_for_each(|item| self.mark_usage(source, field, item)),
            Value::Map(map) => map
                .values()
                .try_for_each(|entry| self.mark_usage(source, field, &entry.token)),
            _ => Ok(()),
        }
    }

    fn sub_behavior_field(
        &mut self,
        source: &Source<'_>,
        node: &str,
        key: &str,
        entry: &KeyedToken,
    ) -> Result<(), ExtractError> {
        let field = self.field_symbol(source, node, key, entry, SymbolKind::Method)?;
        match &entry.token.value {
            Value::List(items) => items
                .iter()
                .try_for_each(|item| self.call_behavior(source, node, key, field, item)),
            _ => self.call_behavior(source, node, key, field, &entry.token),
        }
    }

    /// Call reference from `field` to a behavior named by string or
    /// embedded as a node
    fn call_behavior(
        &mut self,
        source: &Source<'_>,
        node: &str,
        key: &str,
        field: SymbolId,
        token: &Token,
    ) -> Result<(), ExtractError> {
        match &token.value {
            Value::String(target) => self.link(
                source,
                field,
                target,
                SymbolKind::Function,
                ReferenceKind::Call,
                token,
            ),
            Value::Map(child) => {
                let child_id = self.walk_node(source, child)?;
                let reference = self.builder.add_reference(field, child_id, ReferenceKind::Call)?;
                self.builder.attach_location(reference, source.file, source.span(token))?;
                Ok(())
            }
            _ => Err(invalid_field(
                source,
                node,
                key,
                token,
                "a behavior id or behavior node",
            )),
        }
    }

    fn condition_field(
        &mut self,
        source: &Source<'_>,
        node: &str,
        key: &str,
        entry: &KeyedToken,
    ) -> Result<(), ExtractError> {
        let field = self.field_symbol(source, node, key, entry, SymbolKind::Function)?;
        self.condition_value(source, field, &entry.token)
    }

    fn condition_value(&mut self, source: &Source<'_>, owner: SymbolId, token: &Token) -> Result<(), ExtractError> {
        match &token.value {
            Value::String(target) => self.link(
                source,
                owner,
                target,
                SymbolKind::GlobalVariable,
                ReferenceKind::Usage,
                token,
            ),
            Value::List(items) => items.iter().try_for_each(|item| match &item.value {
                Value::Map(clause) => self.condition_clause(source, owner, clause),
                _ => Ok(()),
            }),
            Value::Map(clause) => self.condition_clause(source, owner, clause),
            _ => Ok(()),
        }
    }

    /// Clause-type keys become class symbols used by `owner`; operands hang
    /// off the clause type, combinators and the type key off `owner`.
    fn condition_clause(
        &mut self,
        source: &Source<'_>,
        owner: SymbolId,
        clause: &TokenMap,
    ) -> Result<(), ExtractError> {
        for (key, entry) in clause {
            let mut operand_owner = owner;
            if self.schema.is_clause_key(key) {
                let clause_type = self
                    .builder
                    .intern_decorated_symbol(key, SymbolKind::Class, key, "")?;
                let reference = self.builder.add_reference(owner, clause_type, ReferenceKind::Usage)?;
                self.builder.attach_location(reference, source.file, source.span(&entry.key))?;
                operand_owner = clause_type;
            }
            self.condition_value(source, operand_owner, &entry.token)?;
        }
        Ok(())
    }

    fn plain_field(
        &mut self,
        source: &Source<'_>,
        node: &str,
        key: &str,
        entry: &KeyedToken,
    ) -> Result<(), ExtractError> {
        let field = self.field_symbol(source, node, key, entry, SymbolKind::Field)?;
        if let Value::String(target) = &entry.token.value {
            self.link(
                source,
                field,
                target,
                SymbolKind::GlobalVariable,
                ReferenceKind::Usage,
                &entry.token,
            )?;
        }
        Ok(())
    }
}

fn invalid_field(
    source: &Source<'_>,
    node: &str,
    key: &str,
    token: &Token,
    expected: &'static str,
) -> ExtractError {
    ExtractError::InvalidField {
        node: node.to_string(),
        key: key.to_string(),
        line: source.line(token),
        expected,
        found: token.value.kind_name(),
    }
}
