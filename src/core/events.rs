use crate::core::menu::MenuId;

/// Lifecycle notifications emitted by the [`Navigator`](super::navigator::Navigator).
///
/// Subscribers see each event once, in the order the transitions happen:
///
/// ```text
/// Starting → MenuCreated(root) → ActiveMenuChanged → Started
///          → ... (open / close / switch) ...
///          → MenuDisposed(root) → Stopped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    Starting,
    Started,
    Stopped,
    ActiveMenuChanged { from: Option<MenuId>, to: MenuId },
    MenuCreated(MenuId),
    MenuDisposed(MenuId),
}
