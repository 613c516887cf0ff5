use anyhow::{anyhow, Result};
use tracing::instrument;
use xcb::{
    x::{self, Atom, GetProperty, Window},
    Connection,
};

use super::{FocusedWindow, WindowManager};

fn get_focus_window(conn: &Connection) -> Result<Window> {
    let reply = conn.wait_for_reply(conn.send_request(&x::GetInputFocus {}))?;
    Ok(reply.focus())
}

fn get_property_bytes(conn: &Connection, window: Window, property: Atom) -> Result<Vec<u8>> {
    let reply = conn.wait_for_reply(conn.send_request(&GetProperty {
        delete: false,
        window,
        property,
        r#type: x::ATOM_ANY,
        long_offset: 0,
        long_length: u32::MAX,
    }))?;
    Ok(reply.value::<u8>().to_vec())
}

/// Subscribes the root window to property changes. The request is checked, so a failure here
/// means the connection can't be used for tracking.
fn watch_root(conn: &Connection, root: Window) -> Result<()> {
    conn.send_and_check_request(&x::ChangeWindowAttributes {
        window: root,
        value_list: &[x::Cw::EventMask(x::EventMask::PROPERTY_CHANGE)],
    })?;
    Ok(())
}

pub struct LinuxWindowManager {
    connection: Connection,
}

impl LinuxWindowManager {
    pub fn new() -> Result<Self> {
        let (connection, preferred_screen) = xcb::Connection::connect(None)?;
        let root = connection
            .get_setup()
            .roots()
            .nth(preferred_screen.max(0) as usize)
            .ok_or_else(|| anyhow!("X11 screen {preferred_screen} doesn't exist"))?
            .root();
        watch_root(&connection, root)?;
        Ok(Self { connection })
    }
}

impl WindowManager for LinuxWindowManager {
    #[instrument(skip(self))]
    fn get_focused_window(&mut self) -> Result<FocusedWindow> {
        let focus = get_focus_window(&self.connection)?;
        let class = get_property_bytes(&self.connection, focus, x::ATOM_WM_CLASS)?;
        let title = get_property_bytes(&self.connection, focus, x::ATOM_WM_NAME)?;
        Ok(FocusedWindow {
            class: String::from_utf8_lossy(&class).into(),
            title: String::from_utf8_lossy(&title).into(),
        })
    }
}
