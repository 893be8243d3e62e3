//! # Menus
//!
//! A `Menu` is a node in the navigation tree: a title, some styling, and an
//! ordered list of commands. Every menu carries two built-ins:
//!
//! ```text
//! exit   Exit this menu            → navigator.close_menu(self.id)
//! help   Prints the command list   → navigator.print_help(self.id)
//! ```
//!
//! Concrete menus are described by a [`MenuType`]. The navigator seeds a
//! fresh `Menu` (id, default style, built-ins), then lets the menu type add
//! its own title and commands:
//!
//! ```rust,ignore
//! struct MainMenu;
//!
//! impl MenuType for MainMenu {
//!     fn build(menu: &mut Menu, _params: &[MenuParam]) -> Result<(), MenuError> {
//!         menu.title = "Main".into();
//!         menu.add_command("ping", "Replies with pong", |nav| {
//!             nav.write_line("pong")?;
//!             Ok(())
//!         })
//!     }
//! }
//! ```

use std::fmt;

use crossterm::style::Color;
use log::debug;
use uuid::Uuid;

use crate::core::command::{Command, CommandError};
use crate::core::navigator::Navigator;

pub const DEFAULT_TITLE_DECORATION: &str = "-==< ";
pub const DEFAULT_PROMPT: &str = "> ";

/// Process-unique, opaque menu identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuId(Uuid);

impl MenuId {
    pub fn new() -> Self {
        MenuId(Uuid::new_v4())
    }
}

impl Default for MenuId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display attributes of a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuStyle {
    pub title_colour: Color,
    pub decoration_colour: Color,
    pub prompt_colour: Color,
    /// Bracket-like wrapper printed before the title, and reversed after it.
    pub decoration: String,
    pub prompt: String,
}

impl Default for MenuStyle {
    fn default() -> Self {
        Self {
            title_colour: Color::Green,
            decoration_colour: Color::Yellow,
            prompt_colour: Color::White,
            decoration: DEFAULT_TITLE_DECORATION.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

/// Lifecycle notifications of a single menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Created(MenuId),
    Disposed(MenuId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// A command with this name is already registered on the menu.
    DuplicateCommand { menu: MenuId, name: String },
    /// The menu has been closed and may no longer be modified.
    Disposed(MenuId),
    /// The menu could not be built from the given parameters.
    Parameters(String),
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::DuplicateCommand { menu, name } => {
                write!(f, "command '{name}' already exists on menu {menu}")
            }
            MenuError::Disposed(id) => write!(f, "menu {id} has been disposed"),
            MenuError::Parameters(msg) => write!(f, "invalid menu parameters: {msg}"),
        }
    }
}

impl std::error::Error for MenuError {}

/// One entry of the ordered parameter list handed to a menu builder.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuParam {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl MenuParam {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MenuParam::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MenuParam::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            MenuParam::Float(x) => Some(*x),
            MenuParam::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MenuParam::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            MenuParam::Text(_) => "text",
            MenuParam::Int(_) => "int",
            MenuParam::Float(_) => "float",
            MenuParam::Bool(_) => "bool",
        }
    }

    /// Fails unless exactly `expected` parameters were given.
    pub fn expect_arity(params: &[MenuParam], expected: usize) -> Result<(), MenuError> {
        if params.len() == expected {
            Ok(())
        } else {
            Err(MenuError::Parameters(format!(
                "expected {expected} parameter(s), got {}",
                params.len()
            )))
        }
    }

    pub fn text_at(params: &[MenuParam], index: usize) -> Result<&str, MenuError> {
        let param = Self::at(params, index)?;
        param.as_str().ok_or_else(|| Self::mistyped(param, index, "text"))
    }

    pub fn int_at(params: &[MenuParam], index: usize) -> Result<i64, MenuError> {
        let param = Self::at(params, index)?;
        param.as_int().ok_or_else(|| Self::mistyped(param, index, "int"))
    }

    pub fn bool_at(params: &[MenuParam], index: usize) -> Result<bool, MenuError> {
        let param = Self::at(params, index)?;
        param.as_bool().ok_or_else(|| Self::mistyped(param, index, "bool"))
    }

    fn at(params: &[MenuParam], index: usize) -> Result<&MenuParam, MenuError> {
        params
            .get(index)
            .ok_or_else(|| MenuError::Parameters(format!("missing parameter #{index}")))
    }

    fn mistyped(param: &MenuParam, index: usize, wanted: &str) -> MenuError {
        MenuError::Parameters(format!(
            "parameter #{index} should be {wanted}, got {}",
            param.kind()
        ))
    }
}

impl From<&str> for MenuParam {
    fn from(s: &str) -> Self {
        MenuParam::Text(s.to_string())
    }
}

impl From<String> for MenuParam {
    fn from(s: String) -> Self {
        MenuParam::Text(s)
    }
}

impl From<i64> for MenuParam {
    fn from(i: i64) -> Self {
        MenuParam::Int(i)
    }
}

impl From<i32> for MenuParam {
    fn from(i: i32) -> Self {
        MenuParam::Int(i64::from(i))
    }
}

impl From<f64> for MenuParam {
    fn from(x: f64) -> Self {
        MenuParam::Float(x)
    }
}

impl From<bool> for MenuParam {
    fn from(b: bool) -> Self {
        MenuParam::Bool(b)
    }
}

/// A kind of menu the navigator can open.
pub trait MenuType {
    /// Adds the title, style overrides and commands of this menu type to a
    /// freshly seeded menu.
    fn build(menu: &mut Menu, params: &[MenuParam]) -> Result<(), MenuError>;
}

type MenuListener = Box<dyn FnMut(&MenuEvent)>;

pub struct Menu {
    id: MenuId,
    parent_id: Option<MenuId>,
    pub title: String,
    pub style: MenuStyle,
    commands: Vec<Command>,
    disposed: bool,
    listeners: Vec<MenuListener>,
}

impl Menu {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_style(title, MenuStyle::default())
    }

    pub fn with_style(title: impl Into<String>, style: MenuStyle) -> Self {
        let id = MenuId::new();
        let exit = Command::new("exit", "Exit this menu", move |nav: &mut Navigator| {
            nav.close_menu(id)?;
            Ok(())
        });
        let help = Command::new("help", "Prints the command list", move |nav: &mut Navigator| {
            nav.print_help(id)?;
            Ok(())
        });

        Self {
            id,
            parent_id: None,
            title: title.into(),
            style,
            commands: vec![exit, help],
            disposed: false,
            listeners: Vec::new(),
        }
    }

    pub fn id(&self) -> MenuId {
        self.id
    }

    pub fn parent_id(&self) -> Option<MenuId> {
        self.parent_id
    }

    pub(crate) fn set_parent(&mut self, parent: MenuId) {
        self.parent_id = Some(parent);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Commands in registration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Exact, case-sensitive lookup.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn add_command<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        action: F,
    ) -> Result<(), MenuError>
    where
        F: Fn(&mut Navigator) -> Result<(), CommandError> + 'static,
    {
        if self.disposed {
            return Err(MenuError::Disposed(self.id));
        }
        let command = Command::new(name, description, action);
        if self.command(command.name()).is_some() {
            return Err(MenuError::DuplicateCommand {
                menu: self.id,
                name: command.name().to_string(),
            });
        }
        debug!("Menu {}: registered command '{}'", self.id, command.name());
        self.commands.push(command);
        Ok(())
    }

    /// Registers a listener for this menu's lifecycle events.
    pub fn on_event(&mut self, listener: impl FnMut(&MenuEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub(crate) fn notify_created(&mut self) {
        self.emit(MenuEvent::Created(self.id));
    }

    /// Clears the commands and fires `Disposed`. Returns `false` if the menu
    /// was already disposed, in which case nothing happens.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;
        self.commands.clear();
        self.emit(MenuEvent::Disposed(self.id));
        self.listeners.clear();
        true
    }

    fn emit(&mut self, event: MenuEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("id", &self.id)
            .field("parent_id", &self.parent_id)
            .field("title", &self.title)
            .field("commands", &self.commands)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
