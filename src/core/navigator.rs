//! # Navigator
//!
//! The menu-navigation state machine. Owns every open menu, knows which one
//! is active, and runs the blocking read → dispatch loop.
//!
//! ```text
//! Navigator
//! ├── presenter: Box<dyn Presenter>     // headers, lists, results
//! ├── reader: Box<dyn LineReader>       // prompted input
//! ├── menus: HashMap<MenuId, Menu>      // live menus (a forest via parent_id)
//! ├── active: Option<MenuId>            // always a key of `menus` when set
//! ├── state: NavState                   // NotRunning → Running → Stopped
//! ├── running: bool                     // loop keeps going while true
//! ├── statistics_enabled: bool          // report a result after each command
//! ├── failure_policy: FailurePolicy     // what a failed command does to the run
//! └── subscribers: Vec<listener>        // NavEvent observers
//! ```
//!
//! ## Dispatch step
//!
//! ```text
//! read_line(active.prompt)
//!   ├── Cancelled → retract the prompt line, back to the top
//!   ├── Closed    → close every menu, loop ends
//!   └── "text"    → exact lookup on the active menu
//!                     ├── none  → "Unknown command"
//!                     └── found → execute → [report] → blank line
//! ```
//!
//! Closing a menu with a parent hands focus back to the parent. Closing a
//! root clears `running`; the loop notices before its next read.
//!
//! There is one navigator per console session, constructed by the host and
//! passed to every command action. It is single-threaded by construction.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::io;

use crossterm::style::Color;
use log::{debug, info, warn};

use crate::FailurePolicy;
use crate::console::{CrosstermConsole, InputError, LineReader, Presenter};
use crate::core::command::CommandError;
use crate::core::config::ResolvedConfig;
use crate::core::events::NavEvent;
use crate::core::menu::{Menu, MenuError, MenuId, MenuParam, MenuStyle, MenuType};
use crate::core::result::{CommandResult, CommandStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// `start` has never been called.
    NotRunning,
    /// The dispatch loop is active.
    Running,
    /// The loop has exited. `start` may be called again.
    Stopped,
}

#[derive(Debug)]
pub enum NavError {
    /// `start` was called while the loop was already running.
    AlreadyRunning,
    /// No live menu has this identifier.
    UnknownMenu(MenuId),
    /// The requested menu type rejected its parameters or its commands.
    Instantiation { menu_type: String, source: MenuError },
    Menu(MenuError),
    Io(io::Error),
    /// A command failed under [`FailurePolicy::Propagate`].
    CommandFailed { command: String, message: String },
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::AlreadyRunning => write!(f, "navigator is already running"),
            NavError::UnknownMenu(id) => write!(f, "unknown menu: {id}"),
            NavError::Instantiation { menu_type, source } => {
                write!(f, "cannot instantiate menu {menu_type}: {source}")
            }
            NavError::Menu(e) => write!(f, "menu error: {e}"),
            NavError::Io(e) => write!(f, "console I/O error: {e}"),
            NavError::CommandFailed { command, message } => {
                write!(f, "command '{command}' failed: {message}")
            }
        }
    }
}

impl std::error::Error for NavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavError::Instantiation { source, .. } => Some(source),
            NavError::Menu(e) => Some(e),
            NavError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MenuError> for NavError {
    fn from(e: MenuError) -> Self {
        NavError::Menu(e)
    }
}

impl From<io::Error> for NavError {
    fn from(e: io::Error) -> Self {
        NavError::Io(e)
    }
}

type Subscriber = Box<dyn FnMut(&NavEvent)>;

pub struct Navigator {
    presenter: Box<dyn Presenter>,
    reader: Box<dyn LineReader>,
    menus: HashMap<MenuId, Menu>,
    active: Option<MenuId>,
    state: NavState,
    running: bool,
    statistics_enabled: bool,
    failure_policy: FailurePolicy,
    default_style: MenuStyle,
    subscribers: Vec<Subscriber>,
}

impl Navigator {
    pub fn new(presenter: Box<dyn Presenter>, reader: Box<dyn LineReader>) -> Self {
        Self {
            presenter,
            reader,
            menus: HashMap::new(),
            active: None,
            state: NavState::NotRunning,
            running: false,
            statistics_enabled: false,
            failure_policy: FailurePolicy::default(),
            default_style: MenuStyle::default(),
            subscribers: Vec::new(),
        }
    }

    /// A navigator on the process terminal.
    pub fn with_console() -> Self {
        Self::new(
            Box::new(CrosstermConsole::new()),
            Box::new(CrosstermConsole::new()),
        )
    }

    pub fn from_config(
        config: &ResolvedConfig,
        presenter: Box<dyn Presenter>,
        reader: Box<dyn LineReader>,
    ) -> Self {
        let mut nav = Self::new(presenter, reader);
        nav.statistics_enabled = config.statistics;
        nav.failure_policy = config.failure_policy;
        nav.default_style = config.style.clone();
        nav
    }

    // ------------------------------------------------------------------
    // Settings and queries
    // ------------------------------------------------------------------

    pub fn statistics_enabled(&self) -> bool {
        self.statistics_enabled
    }

    pub fn set_statistics_enabled(&mut self, enabled: bool) {
        self.statistics_enabled = enabled;
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn set_failure_policy(&mut self, policy: FailurePolicy) {
        self.failure_policy = policy;
    }

    /// Style given to every menu before its builder runs.
    pub fn set_default_style(&mut self, style: MenuStyle) {
        self.default_style = style;
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn active_menu_id(&self) -> Option<MenuId> {
        self.active
    }

    pub fn active_menu(&self) -> Option<&Menu> {
        self.active.and_then(|id| self.menus.get(&id))
    }

    pub fn menu(&self, id: MenuId) -> Option<&Menu> {
        self.menus.get(&id)
    }

    pub fn menu_mut(&mut self, id: MenuId) -> Option<&mut Menu> {
        self.menus.get_mut(&id)
    }

    pub fn open_menu_ids(&self) -> Vec<MenuId> {
        self.menus.keys().copied().collect()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&NavEvent) + 'static) {
        self.subscribers.push(Box::new(listener));
    }

    // ------------------------------------------------------------------
    // Console access for command actions
    // ------------------------------------------------------------------

    pub fn presenter(&mut self) -> &mut dyn Presenter {
        self.presenter.as_mut()
    }

    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.presenter.write_line(text, None)
    }

    pub fn write_coloured(&mut self, text: &str, colour: Color) -> io::Result<()> {
        self.presenter.write_line(text, Some(colour))
    }

    /// Prompts for one line in the active menu's prompt colour. Propagating
    /// the error out of an action with `?` turns a cancelled read into a
    /// Cancelled result.
    pub fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        let colour = self
            .active_menu()
            .map(|m| m.style.prompt_colour)
            .unwrap_or(self.default_style.prompt_colour);
        self.reader.read_line(prompt, colour)
    }

    /// Prints the command list of a menu (the built-in `help`).
    pub fn print_help(&mut self, id: MenuId) -> Result<(), NavError> {
        let menu = self.menus.get(&id).ok_or(NavError::UnknownMenu(id))?;
        self.presenter.command_list(menu.commands())?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Run loop
    // ------------------------------------------------------------------

    /// Opens `M` as the root menu and blocks until no menu is left open.
    pub fn start<M: MenuType>(&mut self, params: &[MenuParam]) -> Result<(), NavError> {
        self.start_with(type_name::<M>(), M::build, params)
    }

    pub fn start_with<B>(
        &mut self,
        menu_type: &str,
        build: B,
        params: &[MenuParam],
    ) -> Result<(), NavError>
    where
        B: FnOnce(&mut Menu, &[MenuParam]) -> Result<(), MenuError>,
    {
        if self.state == NavState::Running {
            return Err(NavError::AlreadyRunning);
        }
        if !self.menus.is_empty() {
            warn!("{} menu(s) still open before start, closing them", self.menus.len());
            self.close_all();
        }

        info!("Navigator starting with root menu {}", menu_type);
        self.emit(NavEvent::Starting);

        self.open_menu_with(menu_type, build, params)?;
        self.running = true;
        self.state = NavState::Running;
        self.emit(NavEvent::Started);

        let mut outcome = Ok(());
        while self.running {
            if let Err(e) = self.take_command() {
                warn!("Navigator stopping on error: {}", e);
                self.close_all();
                outcome = Err(e);
                break;
            }
        }

        self.running = false;
        self.state = NavState::Stopped;
        info!("Navigator stopped");
        self.emit(NavEvent::Stopped);
        outcome
    }

    fn take_command(&mut self) -> Result<(), NavError> {
        let Some(active) = self.active else {
            self.running = false;
            return Ok(());
        };
        let menu = self.menus.get(&active).ok_or(NavError::UnknownMenu(active))?;
        let prompt = menu.style.prompt.clone();
        let colour = menu.style.prompt_colour;

        let input = match self.reader.read_line(&prompt, colour) {
            Ok(line) => line,
            Err(InputError::Cancelled) => {
                debug!("Prompt read cancelled on menu {}", active);
                self.reader.retract_line()?;
                return Ok(());
            }
            Err(InputError::Closed) => {
                info!("Input closed, closing all menus");
                self.close_all();
                return Ok(());
            }
            Err(InputError::Io(e)) => return Err(NavError::Io(e)),
        };

        let Some(command) = self.menus.get(&active).and_then(|m| m.command(&input)).cloned()
        else {
            debug!("Unknown command '{}' on menu {}", input, active);
            self.presenter.unknown_command(&input)?;
            return Ok(());
        };

        info!("Dispatching '{}' on menu {}", command.name(), active);
        let result = command.execute(self);
        self.finish_command(command.name(), result)
    }

    fn finish_command(&mut self, name: &str, result: CommandResult) -> Result<(), NavError> {
        if result.cause() == Some(&CommandError::InputClosed) {
            info!("Input closed during '{}', closing all menus", name);
            self.close_all();
            return Ok(());
        }

        let failed = result.status() == CommandStatus::Failure;
        if self.statistics_enabled || (failed && self.failure_policy == FailurePolicy::Report) {
            self.presenter.command_result(&result)?;
        }

        if failed {
            let message = result.cause().map(ToString::to_string).unwrap_or_default();
            warn!("Command '{}' failed: {}", name, message);
            if self.failure_policy == FailurePolicy::Propagate {
                return Err(NavError::CommandFailed {
                    command: name.to_string(),
                    message,
                });
            }
        }

        self.presenter.blank_line()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Open / close / switch
    // ------------------------------------------------------------------

    /// Opens a menu of type `M`. If a menu is active it becomes the parent.
    pub fn open_menu<M: MenuType>(&mut self, params: &[MenuParam]) -> Result<MenuId, NavError> {
        self.open_menu_with(type_name::<M>(), M::build, params)
    }

    /// Opens a menu built by `build`; `menu_type` names it in errors and logs.
    pub fn open_menu_with<B>(
        &mut self,
        menu_type: &str,
        build: B,
        params: &[MenuParam],
    ) -> Result<MenuId, NavError>
    where
        B: FnOnce(&mut Menu, &[MenuParam]) -> Result<(), MenuError>,
    {
        let mut menu = Menu::with_style(String::new(), self.default_style.clone());
        build(&mut menu, params).map_err(|source| NavError::Instantiation {
            menu_type: menu_type.to_string(),
            source,
        })?;

        let id = menu.id();
        if let Some(parent) = self.active {
            menu.set_parent(parent);
            self.presenter.blank_line()?;
        }

        info!(
            "Opened menu {} '{}' ({}), parent {:?}",
            id,
            menu.title,
            menu_type,
            menu.parent_id()
        );
        menu.notify_created();
        self.menus.insert(id, menu);
        self.emit(NavEvent::MenuCreated(id));

        self.switch_to_menu(id)?;
        Ok(id)
    }

    pub fn close_active_menu(&mut self) -> Result<(), NavError> {
        match self.active {
            Some(id) => self.close_menu(id),
            None => Ok(()),
        }
    }

    /// Closes a menu and any menus opened beneath it. Focus returns to the
    /// parent; closing a root ends the run.
    pub fn close_menu(&mut self, id: MenuId) -> Result<(), NavError> {
        if !self.menus.contains_key(&id) {
            return Err(NavError::UnknownMenu(id));
        }

        for descendant in self.descendants_of(id) {
            self.dispose_menu(descendant);
        }
        let parent = self.dispose_menu(id);

        match parent {
            Some(parent) if self.menus.contains_key(&parent) => self.switch_to_menu(parent),
            _ => {
                debug!("Closed root menu {}", id);
                self.running = false;
                if self.active.is_some_and(|a| !self.menus.contains_key(&a)) {
                    self.active = None;
                }
                Ok(())
            }
        }
    }

    /// Makes `id` the active menu and prints its header. Switching to the
    /// menu that is already active does nothing.
    pub fn switch_to_menu(&mut self, id: MenuId) -> Result<(), NavError> {
        if self.active == Some(id) {
            return Ok(());
        }
        let menu = self.menus.get(&id).ok_or(NavError::UnknownMenu(id))?;
        let previous = self.active.replace(id);
        debug!("Active menu {:?} -> {}", previous, id);
        self.presenter.menu_header(menu)?;
        self.emit(NavEvent::ActiveMenuChanged { from: previous, to: id });
        Ok(())
    }

    /// Removes and disposes one menu, returning its parent.
    fn dispose_menu(&mut self, id: MenuId) -> Option<MenuId> {
        let mut menu = self.menus.remove(&id)?;
        let parent = menu.parent_id();
        if menu.dispose() {
            debug!("Disposed menu {} '{}'", id, menu.title);
            self.emit(NavEvent::MenuDisposed(id));
        }
        parent
    }

    /// Every live menu below `id`, children before their parents.
    fn descendants_of(&self, id: MenuId) -> Vec<MenuId> {
        let mut found = Vec::new();
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            for menu in self.menus.values().filter(|m| m.parent_id() == Some(current)) {
                found.push(menu.id());
                frontier.push(menu.id());
            }
        }
        found.reverse();
        found
    }

    fn close_all(&mut self) {
        let roots: Vec<MenuId> = self
            .menus
            .values()
            .filter(|m| m.parent_id().is_none_or(|p| !self.menus.contains_key(&p)))
            .map(Menu::id)
            .collect();
        for root in roots {
            for descendant in self.descendants_of(root) {
                self.dispose_menu(descendant);
            }
            self.dispose_menu(root);
        }
        self.active = None;
        self.running = false;
    }

    fn emit(&mut self, event: NavEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::menu::MenuEvent;
    use crate::test_support::{TestConsole, test_navigator};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct Root;

    impl MenuType for Root {
        fn build(menu: &mut Menu, _params: &[MenuParam]) -> Result<(), MenuError> {
            menu.title = "Root".into();
            menu.add_command("sub", "Open a submenu", |nav| {
                nav.open_menu::<Sub>(&["Nested".into()])?;
                Ok(())
            })
        }
    }

    struct Sub;

    impl MenuType for Sub {
        fn build(menu: &mut Menu, params: &[MenuParam]) -> Result<(), MenuError> {
            MenuParam::expect_arity(params, 1)?;
            menu.title = MenuParam::text_at(params, 0)?.to_string();
            Ok(())
        }
    }

    struct Clashing;

    impl MenuType for Clashing {
        fn build(menu: &mut Menu, _params: &[MenuParam]) -> Result<(), MenuError> {
            menu.add_command("help", "Not the real help", |_| Ok(()))
        }
    }

    fn record_events(nav: &mut Navigator) -> Rc<RefCell<Vec<NavEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        nav.subscribe(move |e| sink.borrow_mut().push(*e));
        events
    }

    fn counting(menu: &mut Menu, name: &str, counter: &Rc<Cell<u32>>) {
        let counter = counter.clone();
        menu.add_command(name, "Counts", move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        })
        .unwrap();
    }

    // ========================================================================
    // Open / close / switch
    // ========================================================================

    #[test]
    fn test_first_menu_has_no_parent() {
        let (mut nav, console) = test_navigator(&[]);
        let root = nav.open_menu::<Root>(&[]).unwrap();

        assert_eq!(nav.active_menu_id(), Some(root));
        assert_eq!(nav.menu(root).unwrap().parent_id(), None);
        assert_eq!(nav.menu(root).unwrap().title, "Root");
        assert_eq!(console.headers(), 1);
        assert_eq!(console.lines()[0], "-==< Root >==-");
    }

    #[test]
    fn test_nested_menu_records_parent() {
        let (mut nav, console) = test_navigator(&[]);
        let root = nav.open_menu::<Root>(&[]).unwrap();
        let lines_before = console.lines().len();

        let sub = nav.open_menu::<Sub>(&["Nested".into()]).unwrap();

        assert_eq!(nav.menu(sub).unwrap().parent_id(), Some(root));
        assert_eq!(nav.active_menu_id(), Some(sub));
        // blank separator, then the new header
        assert_eq!(console.lines()[lines_before], "");
        assert_eq!(console.lines()[lines_before + 1], "-==< Nested >==-");
    }

    #[test]
    fn test_closing_child_returns_to_parent() {
        let (mut nav, console) = test_navigator(&[]);
        let root = nav.open_menu::<Root>(&[]).unwrap();
        let sub = nav.open_menu::<Sub>(&["Nested".into()]).unwrap();

        nav.close_menu(sub).unwrap();

        assert_eq!(nav.active_menu_id(), Some(root));
        assert!(nav.menu(sub).is_none());
        assert_eq!(console.headers(), 3);
    }

    #[test]
    fn test_closing_root_clears_running_and_active() {
        let (mut nav, _console) = test_navigator(&[]);
        let root = nav.open_menu::<Root>(&[]).unwrap();

        nav.close_active_menu().unwrap();

        assert!(!nav.is_running());
        assert_eq!(nav.active_menu_id(), None);
        assert!(nav.menu(root).is_none());
    }

    #[test]
    fn test_switch_to_active_menu_is_noop() {
        let (mut nav, console) = test_navigator(&[]);
        let root = nav.open_menu::<Root>(&[]).unwrap();
        let events = record_events(&mut nav);

        nav.switch_to_menu(root).unwrap();

        assert_eq!(console.headers(), 1);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_switch_back_to_parent_fires_change() {
        let (mut nav, console) = test_navigator(&[]);
        let root = nav.open_menu::<Root>(&[]).unwrap();
        let sub = nav.open_menu::<Sub>(&["Nested".into()]).unwrap();
        let events = record_events(&mut nav);

        nav.switch_to_menu(root).unwrap();

        assert_eq!(console.headers(), 3);
        assert_eq!(
            *events.borrow(),
            vec![NavEvent::ActiveMenuChanged { from: Some(sub), to: root }]
        );
    }

    #[test]
    fn test_unknown_menu_errors() {
        let (mut nav, _console) = test_navigator(&[]);
        nav.open_menu::<Root>(&[]).unwrap();
        let stranger = MenuId::new();

        assert!(matches!(nav.switch_to_menu(stranger), Err(NavError::UnknownMenu(id)) if id == stranger));
        assert!(matches!(nav.close_menu(stranger), Err(NavError::UnknownMenu(id)) if id == stranger));
    }

    #[test]
    fn test_bad_parameters_fail_instantiation() {
        let (mut nav, console) = test_navigator(&[]);
        let root = nav.open_menu::<Root>(&[]).unwrap();

        let err = nav.open_menu::<Sub>(&[]).unwrap_err();

        assert!(matches!(
            err,
            NavError::Instantiation { ref menu_type, source: MenuError::Parameters(_) }
                if menu_type.ends_with("Sub")
        ));
        assert_eq!(nav.open_menu_ids(), vec![root]);
        assert_eq!(nav.active_menu_id(), Some(root));
        assert_eq!(console.headers(), 1);
    }

    #[test]
    fn test_shadowing_builtin_fails_instantiation() {
        let (mut nav, _console) = test_navigator(&[]);
        let err = nav.open_menu::<Clashing>(&[]).unwrap_err();
        assert!(matches!(
            err,
            NavError::Instantiation {
                source: MenuError::DuplicateCommand { ref name, .. },
                ..
            } if name == "help"
        ));
        assert!(nav.open_menu_ids().is_empty());
    }

    #[test]
    fn test_menu_lifecycle_events_fire_once() {
        let (mut nav, _console) = test_navigator(&[]);
        let menu_events = Rc::new(RefCell::new(Vec::new()));
        let sink = menu_events.clone();

        let id = nav
            .open_menu_with(
                "watched",
                move |menu, _| {
                    menu.on_event(move |e| sink.borrow_mut().push(*e));
                    Ok(())
                },
                &[],
            )
            .unwrap();
        let nav_events = record_events(&mut nav);
        nav.close_menu(id).unwrap();

        assert_eq!(
            *menu_events.borrow(),
            vec![MenuEvent::Created(id), MenuEvent::Disposed(id)]
        );
        assert_eq!(*nav_events.borrow(), vec![NavEvent::MenuDisposed(id)]);
    }

    #[test]
    fn test_closing_a_menu_closes_its_descendants() {
        let (mut nav, _console) = test_navigator(&[]);
        let root = nav.open_menu::<Root>(&[]).unwrap();
        let middle = nav.open_menu::<Sub>(&["Middle".into()]).unwrap();
        let leaf = nav.open_menu::<Sub>(&["Leaf".into()]).unwrap();
        let events = record_events(&mut nav);

        nav.close_menu(middle).unwrap();

        assert_eq!(nav.open_menu_ids(), vec![root]);
        assert_eq!(nav.active_menu_id(), Some(root));
        assert_eq!(
            events.borrow()[..2],
            [NavEvent::MenuDisposed(leaf), NavEvent::MenuDisposed(middle)]
        );
    }

    #[test]
    fn test_default_style_applies_to_new_menus() {
        let (mut nav, _console) = test_navigator(&[]);
        nav.set_default_style(MenuStyle {
            prompt: "$ ".into(),
            ..MenuStyle::default()
        });
        let id = nav.open_menu::<Root>(&[]).unwrap();
        assert_eq!(nav.menu(id).unwrap().style.prompt, "$ ");
    }

    // ========================================================================
    // Run loop
    // ========================================================================

    #[test]
    fn test_run_dispatches_until_root_exits() {
        let (mut nav, console) = test_navigator(&["ping", "bogus", "exit", "never read"]);
        let events = record_events(&mut nav);
        let pings = Rc::new(Cell::new(0));
        let counter = pings.clone();

        nav.start_with(
            "root",
            move |menu, _| {
                counting(menu, "ping", &counter);
                Ok(())
            },
            &[],
        )
        .unwrap();

        assert_eq!(pings.get(), 1);
        assert_eq!(console.unknown(), 1);
        assert_eq!(console.remaining_input(), 1);
        assert_eq!(nav.state(), NavState::Stopped);
        assert!(nav.open_menu_ids().is_empty());

        let events = events.borrow();
        assert_eq!(events[0], NavEvent::Starting);
        assert!(matches!(events[1], NavEvent::MenuCreated(_)));
        assert!(matches!(events[2], NavEvent::ActiveMenuChanged { from: None, .. }));
        assert_eq!(events[3], NavEvent::Started);
        assert!(matches!(events[4], NavEvent::MenuDisposed(_)));
        assert_eq!(events[5], NavEvent::Stopped);
    }

    #[test]
    fn test_prompt_uses_menu_style() {
        let (mut nav, console) = test_navigator(&["exit"]);
        nav.start_with(
            "root",
            |menu, _| {
                menu.style.prompt = "root> ".into();
                menu.style.prompt_colour = Color::Cyan;
                Ok(())
            },
            &[],
        )
        .unwrap();
        assert_eq!(console.prompts(), vec![("root> ".to_string(), Color::Cyan)]);
    }

    #[test]
    fn test_cancelled_prompt_retracts_line() {
        let console = TestConsole::default();
        console.push_cancel();
        console.push_line("exit");
        let mut nav = console.navigator();

        nav.start::<Root>(&[]).unwrap();

        assert_eq!(console.retracts(), 1);
        assert_eq!(console.unknown(), 0);
        assert!(console.results().is_empty());
    }

    #[test]
    fn test_statistics_report_each_command() {
        let (mut nav, console) = test_navigator(&["help", "exit"]);
        nav.set_statistics_enabled(true);

        nav.start::<Root>(&[]).unwrap();

        assert_eq!(
            console.results(),
            vec![CommandStatus::Success, CommandStatus::Success]
        );
    }

    #[test]
    fn test_help_lists_active_commands() {
        let (mut nav, console) = test_navigator(&["help", "exit"]);
        nav.start::<Root>(&[]).unwrap();

        let lines = console.lines();
        let listed = lines
            .iter()
            .filter(|l| l.starts_with("sub ") || l.starts_with("exit "))
            .count();
        // once in the header, once for help
        assert_eq!(listed, 4);
    }

    #[test]
    fn test_submenu_round_trip() {
        let (mut nav, console) = test_navigator(&["sub", "exit", "exit"]);
        let events = record_events(&mut nav);

        nav.start::<Root>(&[]).unwrap();

        assert!(console.lines().contains(&"-==< Nested >==-".to_string()));
        // root header, nested header, root header again
        assert_eq!(console.headers(), 3);
        let disposed = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, NavEvent::MenuDisposed(_)))
            .count();
        assert_eq!(disposed, 2);
    }

    #[test]
    fn test_cancelled_command_input_keeps_running() {
        let console = TestConsole::default();
        console.push_line("ask");
        console.push_cancel();
        console.push_line("exit");
        let mut nav = console.navigator();
        nav.set_statistics_enabled(true);

        nav.start_with(
            "root",
            |menu, _| {
                menu.add_command("ask", "Asks a question", |nav| {
                    let answer = nav.read_line("Name: ")?;
                    nav.write_line(&answer)?;
                    Ok(())
                })
            },
            &[],
        )
        .unwrap();

        assert_eq!(
            console.results(),
            vec![CommandStatus::Cancelled, CommandStatus::Success]
        );
        assert_eq!(console.retracts(), 0);
    }

    #[test]
    fn test_failure_propagates_by_default() {
        let (mut nav, console) = test_navigator(&["boom", "exit"]);
        let events = record_events(&mut nav);

        let err = nav
            .start_with(
                "root",
                |menu, _| menu.add_command("boom", "Fails", |_| Err(CommandError::failed("kaput"))),
                &[],
            )
            .unwrap_err();

        assert!(matches!(
            err,
            NavError::CommandFailed { ref command, ref message } if command == "boom" && message == "kaput"
        ));
        assert_eq!(console.remaining_input(), 1);
        assert!(nav.open_menu_ids().is_empty());
        assert_eq!(nav.state(), NavState::Stopped);
        assert_eq!(events.borrow().last(), Some(&NavEvent::Stopped));
    }

    #[test]
    fn test_failure_reported_under_report_policy() {
        let (mut nav, console) = test_navigator(&["boom", "exit"]);
        nav.set_failure_policy(FailurePolicy::Report);

        nav.start_with(
            "root",
            |menu, _| menu.add_command("boom", "Fails", |_| Err(CommandError::failed("kaput"))),
            &[],
        )
        .unwrap();

        assert_eq!(console.results(), vec![CommandStatus::Failure]);
        assert!(console.lines().contains(&"Error message: kaput".to_string()));
        assert_eq!(console.remaining_input(), 0);
    }

    #[test]
    fn test_closed_input_ends_run_with_nested_menus() {
        let (mut nav, _console) = test_navigator(&["sub"]);
        let events = record_events(&mut nav);

        nav.start::<Root>(&[]).unwrap();

        assert!(nav.open_menu_ids().is_empty());
        assert_eq!(nav.active_menu_id(), None);
        let disposed = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, NavEvent::MenuDisposed(_)))
            .count();
        assert_eq!(disposed, 2);
    }

    #[test]
    fn test_closed_input_inside_command_ends_run() {
        let (mut nav, console) = test_navigator(&["sub", "ask"]);
        nav.set_statistics_enabled(true);
        let events = record_events(&mut nav);

        let outcome = nav.start_with(
            "root",
            |menu, _| {
                menu.add_command("sub", "Open a submenu", |nav| {
                    nav.open_menu_with(
                        "asking",
                        |menu, _| {
                            menu.add_command("ask", "Reads a name", |nav| {
                                nav.read_line("Name: ")?;
                                Ok(())
                            })
                        },
                        &[],
                    )?;
                    Ok(())
                })
            },
            &[],
        );

        assert!(outcome.is_ok());
        assert_eq!(nav.state(), NavState::Stopped);
        assert!(nav.open_menu_ids().is_empty());
        // only "sub" is reported; the interrupted read is not a result
        assert_eq!(console.results(), vec![CommandStatus::Success]);
        assert_eq!(events.borrow().last(), Some(&NavEvent::Stopped));
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let (mut nav, _console) = test_navigator(&["again", "exit"]);
        let rejected = Rc::new(Cell::new(false));
        let flag = rejected.clone();

        nav.start_with(
            "root",
            move |menu, _| {
                let flag = flag.clone();
                menu.add_command("again", "Nested start", move |nav| {
                    let nested = nav.start::<Root>(&[]);
                    flag.set(matches!(nested, Err(NavError::AlreadyRunning)));
                    Ok(())
                })
            },
            &[],
        )
        .unwrap();

        assert!(rejected.get());
    }

    #[test]
    fn test_navigator_can_restart_after_stop() {
        let console = TestConsole::default();
        console.push_line("exit");
        let mut nav = console.navigator();
        nav.start::<Root>(&[]).unwrap();

        console.push_line("exit");
        nav.start::<Root>(&[]).unwrap();

        assert_eq!(nav.state(), NavState::Stopped);
        assert_eq!(console.headers(), 2);
    }

    #[test]
    fn test_failed_root_build_leaves_navigator_idle() {
        let (mut nav, _console) = test_navigator(&[]);
        let err = nav.start::<Sub>(&[]).unwrap_err();
        assert!(matches!(err, NavError::Instantiation { .. }));
        assert_eq!(nav.state(), NavState::NotRunning);
        assert!(!nav.is_running());
    }
}
