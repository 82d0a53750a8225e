use crate::descriptor::ColumnDescriptor;
use crate::types::{DbType, RowValues};

/// How a connector should interpret the text of a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandKind {
    /// Plain SQL text, possibly several statements.
    #[default]
    Text,
    /// A call to a stored routine rendered by the dialect.
    StoredProcedure,
}

/// One named, typed parameter of a command.
///
/// The name is the full token as it appears in the command text (prefix included).
#[derive(Debug, Clone, PartialEq)]
pub struct CommandParameter {
    pub name: String,
    pub db_type: DbType,
    pub size: Option<u32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub is_nullable: bool,
    pub value: RowValues,
}

impl CommandParameter {
    /// Create a parameter holding `value`, with a type tag inferred from the value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: RowValues) -> Self {
        Self {
            name: name.into(),
            db_type: DbType::infer(&value),
            size: None,
            precision: None,
            scale: None,
            is_nullable: true,
            value,
        }
    }

    /// Create an unbound parameter shaped after a column.
    #[must_use]
    pub fn for_column(name: impl Into<String>, column: &ColumnDescriptor) -> Self {
        Self {
            name: name.into(),
            db_type: column.data_type,
            size: column.max_size,
            precision: column.precision,
            scale: column.scale,
            is_nullable: column.is_nullable,
            value: RowValues::Null,
        }
    }

    /// Copy this parameter's shape and value under a new name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

/// Command text plus its ordered parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Command {
    text: String,
    kind: CommandKind,
    parameters: Vec<CommandParameter>,
}

impl Command {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CommandKind::Text,
            parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: CommandKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    #[must_use]
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    #[must_use]
    pub fn parameters(&self) -> &[CommandParameter] {
        &self.parameters
    }

    pub fn add_parameter(&mut self, parameter: CommandParameter) -> &mut CommandParameter {
        self.parameters.push(parameter);
        let last = self.parameters.len() - 1;
        &mut self.parameters[last]
    }

    /// Look a parameter up by its exact token name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&CommandParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Mutable access to the parameter at `index`, in declaration order.
    pub fn parameter_at_mut(&mut self, index: usize) -> Option<&mut CommandParameter> {
        self.parameters.get_mut(index)
    }

    /// The bound values, in declaration order.
    #[must_use]
    pub fn values(&self) -> Vec<RowValues> {
        self.parameters.iter().map(|p| p.value.clone()).collect()
    }
}
