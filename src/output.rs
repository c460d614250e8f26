//! Locating the output whose geometry the pointer matrix is derived from.

use log::debug;
use serde::Serialize;

use crate::backends::DisplayServer;
use crate::error::Result;

/// Placement of the active output inside the screen canvas.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputGeometry {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub total_width: u32,
    pub total_height: u32,
}

/// First output that is connected and driven by a CRTC.
///
/// This is first-match, not best-match: on multi-head setups the result is
/// whichever output the server lists first.
pub fn find_active_output<D: DisplayServer + ?Sized>(
    display: &mut D,
) -> Result<Option<OutputGeometry>> {
    let found = display
        .outputs()?
        .into_iter()
        .find_map(|output| match output.crtc {
            Some(crtc) if output.connected => Some((output.name, crtc)),
            _ => None,
        });

    let (name, crtc) = match found {
        Some(found) => found,
        None => return Ok(None),
    };

    let (total_width, total_height) = display.screen_size()?;
    if total_width == 0 || total_height == 0 {
        debug!("screen reports a size of {}x{}", total_width, total_height);
        return Ok(None);
    }

    Ok(Some(OutputGeometry {
        name,
        x: crtc.x,
        y: crtc.y,
        width: crtc.width,
        height: crtc.height,
        total_width,
        total_height,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::dummy::DummyDisplay;
    use crate::backends::{CrtcGeometry, OutputInfo};

    fn output(name: &str, connected: bool, crtc: Option<CrtcGeometry>) -> OutputInfo {
        OutputInfo {
            name: name.into(),
            connected,
            crtc,
        }
    }

    fn crtc(x: i32, width: u32) -> Option<CrtcGeometry> {
        Some(CrtcGeometry {
            x,
            y: 0,
            width,
            height: 1080,
        })
    }

    #[test]
    fn picks_first_connected_output_with_crtc() -> Result<()> {
        let mut display = DummyDisplay::new(3840, 1080)
            .with_output(output("DP-1", false, crtc(0, 1920)))
            .with_output(output("DP-2", true, None))
            .with_output(output("HDMI-1", true, crtc(1920, 1920)))
            .with_output(output("eDP-1", true, crtc(0, 1920)));

        let geometry = find_active_output(&mut display)?.expect("an active output");
        assert_eq!(
            geometry,
            OutputGeometry {
                name: "HDMI-1".into(),
                x: 1920,
                y: 0,
                width: 1920,
                height: 1080,
                total_width: 3840,
                total_height: 1080,
            }
        );
        Ok(())
    }

    #[test]
    fn no_qualifying_output_is_not_an_error() -> Result<()> {
        let mut display = DummyDisplay::new(1920, 1080)
            .with_output(output("DP-1", false, crtc(0, 1920)))
            .with_output(output("eDP-1", true, None));

        assert_eq!(find_active_output(&mut display)?, None);
        Ok(())
    }

    #[test]
    fn empty_screen_has_no_geometry() -> Result<()> {
        let mut display =
            DummyDisplay::new(0, 0).with_output(output("eDP-1", true, crtc(0, 1920)));
        assert_eq!(find_active_output(&mut display)?, None);
        Ok(())
    }
}
