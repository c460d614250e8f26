//! Writing the "Coordinate Transformation Matrix" property of a device.

use crate::backends::{DeviceId, DisplayServer};
use crate::error::{Error, Result};
use crate::matrix::Matrix;

pub const MATRIX_PROPERTY: &str = "Coordinate Transformation Matrix";
pub const FLOAT_TYPE: &str = "FLOAT";

const MATRIX_ITEMS: u32 = 9;

/// Replace the device's transformation matrix.
///
/// The current value is read first and has to be nine 32-bit floats;
/// anything else is rejected without writing.
pub fn apply_matrix<D: DisplayServer + ?Sized>(
    display: &mut D,
    device: DeviceId,
    matrix: &Matrix,
) -> Result<()> {
    let float = display
        .find_atom(FLOAT_TYPE)?
        .ok_or(Error::PropertyMissing(FLOAT_TYPE))?;
    let property = display
        .find_atom(MATRIX_PROPERTY)?
        .ok_or(Error::PropertyMissing(MATRIX_PROPERTY))?;

    let current = display.device_property(device, property, float, MATRIX_ITEMS)?;
    if current.type_ != float || current.format != 32 {
        return Err(Error::PropertyTypeMismatch {
            found_type: current.type_,
            format: current.format,
        });
    }
    if current.num_items != MATRIX_ITEMS || current.bytes_after != 0 {
        return Err(Error::PropertySizeMismatch {
            items: current.num_items,
            bytes_after: current.bytes_after,
        });
    }

    let mut data = current.data;
    data.resize(MATRIX_ITEMS as usize, 0);
    for (item, value) in data.iter_mut().zip(matrix.values().iter()) {
        *item = value.to_bits();
    }

    display.replace_device_property(device, property, float, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::dummy::{DummyDisplay, Request};
    use crate::backends::PropertyValue;
    use crate::devices::{DeviceDescriptor, DeviceUse};

    const TOUCH: DeviceId = 10;

    fn display() -> DummyDisplay {
        DummyDisplay::new(1920, 1080)
            .with_device(DeviceDescriptor {
                id: TOUCH,
                name: "ELAN Touchscreen".into(),
                use_: DeviceUse::SlavePointer,
            })
            .with_matrix_support()
    }

    fn rotate_90() -> Matrix {
        Matrix::from([0.0, -1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0])
    }

    #[test]
    fn writes_nine_floats() -> Result<()> {
        let mut display = display();
        apply_matrix(&mut display, TOUCH, &rotate_90())?;

        assert_eq!(display.matrix_of(TOUCH), Some(rotate_90()));
        assert_eq!(display.property_writes(), 1);
        Ok(())
    }

    #[test]
    fn missing_atoms_mean_unsupported_server() {
        let mut display = DummyDisplay::new(1920, 1080).with_device(DeviceDescriptor {
            id: TOUCH,
            name: "ELAN Touchscreen".into(),
            use_: DeviceUse::SlavePointer,
        });

        match apply_matrix(&mut display, TOUCH, &rotate_90()) {
            Err(Error::PropertyMissing(_)) => {}
            other => panic!("expected PropertyMissing, got {:?}", other),
        }
        assert_eq!(display.property_writes(), 0);
        assert!(!display
            .requests()
            .iter()
            .any(|r| matches!(r, Request::DeviceProperty(_))));
    }

    #[test]
    fn float_without_matrix_atom_is_unsupported() {
        let mut display = DummyDisplay::new(1920, 1080)
            .with_device(DeviceDescriptor {
                id: TOUCH,
                name: "ELAN Touchscreen".into(),
                use_: DeviceUse::SlavePointer,
            })
            .with_atom(FLOAT_TYPE);

        match apply_matrix(&mut display, TOUCH, &rotate_90()) {
            Err(Error::PropertyMissing(name)) => assert_eq!(name, MATRIX_PROPERTY),
            other => panic!("expected PropertyMissing, got {:?}", other),
        }
        assert_eq!(display.property_writes(), 0);
        assert!(!display
            .requests()
            .iter()
            .any(|r| matches!(r, Request::DeviceProperty(_))));
    }

    #[test]
    fn non_float_type_at_format_32_is_rejected() {
        let mut display = display().with_atom("INTEGER");
        let integer = display.atom("INTEGER");
        assert_ne!(integer, display.atom(FLOAT_TYPE));
        display.set_property(
            TOUCH,
            PropertyValue {
                type_: integer,
                format: 32,
                num_items: 9,
                bytes_after: 0,
                data: vec![0; 9],
            },
        );

        match apply_matrix(&mut display, TOUCH, &rotate_90()) {
            Err(Error::PropertyTypeMismatch { found_type, format: 32 }) => {
                assert_eq!(found_type, integer)
            }
            other => panic!("expected PropertyTypeMismatch, got {:?}", other),
        }
        assert_eq!(display.property_writes(), 0);
    }

    #[test]
    fn wrong_item_count_is_rejected() {
        let mut display = display();
        let float = display.atom(FLOAT_TYPE);
        display.set_property(
            TOUCH,
            PropertyValue {
                type_: float,
                format: 32,
                num_items: 6,
                bytes_after: 0,
                data: vec![0; 6],
            },
        );

        match apply_matrix(&mut display, TOUCH, &rotate_90()) {
            Err(Error::PropertySizeMismatch { items: 6, .. }) => {}
            other => panic!("expected PropertySizeMismatch, got {:?}", other),
        }
        assert_eq!(display.property_writes(), 0);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut display = display();
        let float = display.atom(FLOAT_TYPE);
        display.set_property(
            TOUCH,
            PropertyValue {
                type_: float,
                format: 32,
                num_items: 9,
                bytes_after: 4,
                data: vec![0; 9],
            },
        );

        assert!(matches!(
            apply_matrix(&mut display, TOUCH, &rotate_90()),
            Err(Error::PropertySizeMismatch { bytes_after: 4, .. })
        ));
        assert_eq!(display.property_writes(), 0);
    }

    #[test]
    fn wrong_type_or_format_is_rejected() {
        let mut display = display();
        let float = display.atom(FLOAT_TYPE);
        display.set_property(
            TOUCH,
            PropertyValue {
                type_: float,
                format: 8,
                num_items: 9,
                bytes_after: 0,
                data: vec![0; 9],
            },
        );
        assert!(matches!(
            apply_matrix(&mut display, TOUCH, &rotate_90()),
            Err(Error::PropertyTypeMismatch { format: 8, .. })
        ));

        // A device without the property answers with type None.
        display.set_property(
            TOUCH,
            PropertyValue {
                type_: 0,
                format: 0,
                num_items: 0,
                bytes_after: 0,
                data: Vec::new(),
            },
        );
        assert!(matches!(
            apply_matrix(&mut display, TOUCH, &rotate_90()),
            Err(Error::PropertyTypeMismatch { found_type: 0, .. })
        ));
        assert_eq!(display.property_writes(), 0);
    }

    #[test]
    fn rejected_write_is_reported() {
        let mut display = display().failing_writes_for(TOUCH);
        assert!(matches!(
            apply_matrix(&mut display, TOUCH, &rotate_90()),
            Err(Error::WriteFailed(_))
        ));
    }
}
