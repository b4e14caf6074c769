use crate::pixelformat::yuv_to_rgb;

pub fn rgba_to_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4).flat_map(|c| [c[0], c[1], c[2]]).collect()
}

pub fn argb_to_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4).flat_map(|c| [c[1], c[2], c[3]]).collect()
}

/// Packed 4:2:2 to RGB. Rows are padded to an even width on the wire; the
/// padding pixel of odd-width rows is dropped.
pub fn yuyv_to_rgb(width: usize, height: usize, data: &[u8]) -> Vec<u8> {
    let stride = width.div_ceil(2) * 4;
    let mut rgb = Vec::with_capacity(width * height * 3);

    for row in data.chunks_exact(stride).take(height) {
        let mut remaining = width;
        for chunk in row.chunks_exact(4) {
            let first = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
            rgb.extend_from_slice(&first);
            if remaining >= 2 {
                let second = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
                rgb.extend_from_slice(&second);
            }
            remaining = remaining.saturating_sub(2);
        }
    }

    rgb
}

/// Planar 4:2:0 to RGB, chroma sampled at half resolution in both axes.
pub fn yu12_to_rgb(width: usize, height: usize, data: &[u8]) -> Vec<u8> {
    let y_len = width * height;
    let uv_w = width.div_ceil(2);
    let uv_len = uv_w * height.div_ceil(2);

    let y_plane = &data[..y_len];
    let u_plane = &data[y_len..y_len + uv_len];
    let v_plane = &data[y_len + uv_len..y_len + 2 * uv_len];

    let mut rgb = Vec::with_capacity(y_len * 3);
    for row in 0..height {
        for col in 0..width {
            let chroma = (row / 2) * uv_w + col / 2;
            let pixel = yuv_to_rgb(y_plane[row * width + col], u_plane[chroma], v_plane[chroma]);
            rgb.extend_from_slice(&pixel);
        }
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_odd_width_drops_padding() {
        // 3x1 frame: two groups, the last carries one padding pixel
        let data = vec![128u8; 8];
        let rgb = yuyv_to_rgb(3, 1, &data);
        assert_eq!(rgb.len(), 9);
    }

    #[test]
    fn test_yu12_odd_dimensions() {
        // 3x3 frame: 9 luma samples, 2x2 samples per chroma plane
        let data = vec![128u8; 9 + 4 + 4];
        let rgb = yu12_to_rgb(3, 3, &data);
        assert_eq!(rgb, vec![128u8; 27]);
    }

    #[test]
    fn test_alpha_layouts() {
        assert_eq!(rgba_to_rgb(&[1, 2, 3, 255, 4, 5, 6, 0]), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(argb_to_rgb(&[255, 1, 2, 3]), vec![1, 2, 3]);
    }
}
