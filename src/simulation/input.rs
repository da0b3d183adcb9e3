/// Player commands, already translated from raw keys and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    TriggerPressed,
    TriggerReleased,
    Reload,
    /// Number-row weapon slot, 1 to 4.
    SelectSlot(u8),
}
