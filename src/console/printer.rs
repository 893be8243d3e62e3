//! Rendering of menus and results on top of any [`Presenter`].
//!
//! These back the provided `Presenter` methods. They are free functions so
//! that an implementation overriding a method (to count calls, say) can
//! still fall through to the standard layout.

use std::io;

use crossterm::style::Color;

use super::{Presenter, render};
use crate::core::command::Command;
use crate::core::menu::Menu;
use crate::core::result::{CommandResult, CommandStatus};

/// `<decoration><title><reversed decoration>` on one line.
pub fn print_title<P: Presenter + ?Sized>(out: &mut P, menu: &Menu) -> io::Result<()> {
    let style = &menu.style;
    out.write(&style.decoration, Some(style.decoration_colour))?;
    out.write(&menu.title, Some(style.title_colour))?;
    out.write(&render::reversed(&style.decoration), Some(style.decoration_colour))?;
    out.blank_line()
}

pub fn print_command_list<P: Presenter + ?Sized>(out: &mut P, commands: &[Command]) -> io::Result<()> {
    for row in render::command_rows(commands) {
        out.write_line(&row, None)?;
    }
    Ok(())
}

/// Title, command list, then a blank line.
pub fn print_menu_header<P: Presenter + ?Sized>(out: &mut P, menu: &Menu) -> io::Result<()> {
    out.title(menu)?;
    out.command_list(menu.commands())?;
    out.blank_line()
}

pub fn print_command_result<P: Presenter + ?Sized>(
    out: &mut P,
    result: &CommandResult,
) -> io::Result<()> {
    let status = result.status();
    out.blank_line()?;
    out.write("Command finished with status ", None)?;
    out.write(render::status_label(status), Some(render::status_colour(status)))?;
    out.write_line(
        &format!(" after {}", render::format_duration(result.duration())),
        None,
    )?;
    if status == CommandStatus::Failure
        && let Some(cause) = result.cause()
    {
        out.error_message(&cause.to_string())?;
    }
    Ok(())
}
