//! Menus shown by the `clinav` binary.

use crossterm::style::Color;

use clinav::{CommandError, Menu, MenuError, MenuParam, MenuType};

pub struct MainMenu;

impl MenuType for MainMenu {
    fn build(menu: &mut Menu, _params: &[MenuParam]) -> Result<(), MenuError> {
        menu.title = "clinav demo".into();

        menu.add_command("ping", "Replies with pong", |nav| {
            nav.write_coloured("pong", Color::Cyan)?;
            Ok(())
        })?;

        menu.add_command("greet", "Asks for your name (Esc cancels)", |nav| {
            let name = nav.read_line("Name: ")?;
            let name = name.trim();
            if name.is_empty() {
                return Err(CommandError::failed("no name given"));
            }
            nav.write_line(&format!("Hello, {name}!"))?;
            Ok(())
        })?;

        menu.add_command("settings", "Opens the settings menu", |nav| {
            nav.open_menu::<SettingsMenu>(&["Settings".into()])?;
            Ok(())
        })?;

        menu.add_command("fail", "Fails on purpose", |_| {
            Err(CommandError::failed("this command always fails"))
        })
    }
}

/// Takes its title as the only parameter.
pub struct SettingsMenu;

impl MenuType for SettingsMenu {
    fn build(menu: &mut Menu, params: &[MenuParam]) -> Result<(), MenuError> {
        MenuParam::expect_arity(params, 1)?;
        menu.title = MenuParam::text_at(params, 0)?.to_string();
        menu.style.title_colour = Color::Cyan;

        menu.add_command("stats", "Toggles command statistics", |nav| {
            let enabled = !nav.statistics_enabled();
            nav.set_statistics_enabled(enabled);
            let state = if enabled { "on" } else { "off" };
            nav.write_line(&format!("Statistics {state}"))?;
            Ok(())
        })
    }
}
