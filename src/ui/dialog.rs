/// Native dialogs
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::{Path, PathBuf};

/// Answer to the save prompt shown when closing with tiles on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    Save,
    Discard,
    Cancel,
}

/// Show the native folder picker, starting at `current`
pub fn pick_image_folder(current: &Path) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title("Select image folder");
    if current.is_dir() {
        dialog = dialog.set_directory(current);
    }
    dialog.pick_folder()
}

/// Ask whether to save the layout before closing
pub fn confirm_close() -> CloseChoice {
    let answer = MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title("Exit")
        .set_description("Save the current layout?")
        .set_buttons(MessageButtons::YesNoCancel)
        .show();

    match answer {
        MessageDialogResult::Yes => CloseChoice::Save,
        MessageDialogResult::No => CloseChoice::Discard,
        _ => CloseChoice::Cancel,
    }
}
