use crate::error::{Error, Result};

/// Largest index accepted for a 16-bit index buffer.
///
/// Meshes are limited to 65 535 vertices, so the highest index is one less.
pub const MAX_INDEX: u32 = u16::MAX as u32 - 1;

/// Vertex format for an attribute of `stride` packed floats.
pub fn vertex_format(stride: u32) -> Result<wgpu::VertexFormat> {
    match stride {
        1 => Ok(wgpu::VertexFormat::Float32),
        2 => Ok(wgpu::VertexFormat::Float32x2),
        3 => Ok(wgpu::VertexFormat::Float32x3),
        4 => Ok(wgpu::VertexFormat::Float32x4),
        other => Err(Error::UnsupportedStride(other)),
    }
}

/// Narrows indices to 16 bits, rejecting the first one above [`MAX_INDEX`].
pub fn pack_indices(indices: &[u32]) -> Result<Vec<u16>> {
    indices
        .iter()
        .map(|&i| {
            if i > MAX_INDEX {
                return Err(Error::IndexOutOfRange { index: i });
            }
            Ok(i as u16)
        })
        .collect()
}

/// Rejects empty uploads and uploads the device cannot hold.
pub fn check_allocation(size: u64, max_buffer_size: u64) -> Result<()> {
    if size == 0 {
        return Err(Error::BufferAllocation {
            size,
            reason: "buffer data is empty".into(),
        });
    }
    if size > max_buffer_size {
        return Err(Error::BufferAllocation {
            size,
            reason: format!("exceeds the device limit of {max_buffer_size} bytes"),
        });
    }
    Ok(())
}

/// Number of whole vertices in `floats` packed values of `stride` each.
pub fn vertex_count(floats: u64, stride: u32) -> u32 {
    (floats / u64::from(stride.max(1))).min(u64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_map_to_float_formats() {
        assert_eq!(vertex_format(1).unwrap(), wgpu::VertexFormat::Float32);
        assert_eq!(vertex_format(3).unwrap(), wgpu::VertexFormat::Float32x3);
        assert_eq!(vertex_format(4).unwrap().size(), 16);
        assert!(matches!(vertex_format(0), Err(Error::UnsupportedStride(0))));
        assert!(matches!(vertex_format(5), Err(Error::UnsupportedStride(5))));
    }

    #[test]
    fn indices_narrow_to_u16() {
        assert_eq!(
            pack_indices(&[0, 2, 1, MAX_INDEX]).unwrap(),
            vec![0, 2, 1, u16::MAX - 1]
        );
        assert!(pack_indices(&[]).unwrap().is_empty());
    }

    #[test]
    fn index_past_65534_is_rejected() {
        match pack_indices(&[0, 1, 65_535, 70_000]) {
            Err(Error::IndexOutOfRange { index }) => assert_eq!(index, 65_535),
            other => panic!("unexpected result: {other:?}"),
        }
        match pack_indices(&[0, 1, 65_536]) {
            Err(Error::IndexOutOfRange { index }) => assert_eq!(index, 65_536),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn allocation_bounds() {
        assert!(check_allocation(4, 256).is_ok());
        assert!(check_allocation(256, 256).is_ok());
        assert!(matches!(
            check_allocation(0, 256),
            Err(Error::BufferAllocation { size: 0, .. })
        ));
        assert!(matches!(
            check_allocation(257, 256),
            Err(Error::BufferAllocation { size: 257, .. })
        ));
    }

    #[test]
    fn vertex_count_drops_partial_vertices() {
        assert_eq!(vertex_count(12, 3), 4);
        assert_eq!(vertex_count(13, 3), 4);
        assert_eq!(vertex_count(16, 4), 4);
    }
}
