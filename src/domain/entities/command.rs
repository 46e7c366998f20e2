use std::sync::Arc;
use crate::domain::traits::CommandHandler;

/// Menu section a command is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Main,
    Store,
    Group,
    Owner,
    Tools,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Main,
        Category::Store,
        Category::Group,
        Category::Owner,
        Category::Tools,
        Category::Other,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Category::Main => "Main Menu",
            Category::Store => "Store",
            Category::Group => "Group",
            Category::Owner => "Owner Commands",
            Category::Tools => "Tools",
            Category::Other => "Other",
        }
    }
}

/// Represents a bot command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub category: Category,
    pub handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new<H>(name: impl Into<String>, handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            category: Category::Main,
            handler: Arc::new(handler),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Arguments shown after the command name, e.g. `<kode>`
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn in_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// `input` is expected lowercased
    pub fn matches(&self, input: &str) -> bool {
        self.name == input || self.aliases.iter().any(|a| a == input)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("category", &self.category)
            .finish()
    }
}

/// Command registry for managing available commands, in registration order
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, replacing any earlier one with the same name
    pub fn register(&mut self, command: Command) {
        self.commands.retain(|c| c.name != command.name);
        self.commands.push(command);
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.matches(input))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(move |c| c.category == category)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
