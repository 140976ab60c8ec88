use super::*;

fn px_at(buf: &[u8], w: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * w + x) * 4) as usize;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

#[test]
fn radius_zero_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn interior_of_constant_image_is_unchanged() {
    let (w, h) = (9u32, 9u32);
    let px = [10u8, 20, 30, 40];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 3, 1.0).unwrap();
    assert_eq!(px_at(&out, w, 4, 4), px);
}

#[test]
fn borders_fade_toward_transparent() {
    let (w, h) = (9u32, 9u32);
    let src = [255u8, 255, 255, 255].repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, radius_for_sigma(1.0), 1.0).unwrap();

    let corner = px_at(&out, w, 0, 0);
    let edge = px_at(&out, w, 4, 0);
    let center = px_at(&out, w, 4, 4);
    assert_eq!(center, [255, 255, 255, 255]);
    assert!(corner[3] < edge[3] && edge[3] < 255, "{corner:?} {edge:?}");
    // The outer half of the kernel, minus the center tap, falls outside a straight edge.
    assert!((170..=185).contains(&edge[3]), "{edge:?}");
    // Premultiplied color never exceeds alpha.
    for p in out.chunks_exact(4) {
        assert!(p[0] <= p[3] && p[1] <= p[3] && p[2] <= p[3]);
    }
}

#[test]
fn single_pixel_spreads_and_conserves_energy() {
    let (w, h) = (7u32, 7u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((3 * w + 3) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, radius_for_sigma(1.0), 1.0).unwrap();

    assert!(out.chunks_exact(4).filter(|px| px[3] != 0).count() > 1);
    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 6);
}

#[test]
fn kernel_taps_sum_to_one() {
    for sigma in [0.5f32, 1.0, 2.5] {
        let k = Kernel::gaussian(radius_for_sigma(sigma), sigma).unwrap();
        assert_eq!(k.taps.iter().sum::<u32>(), 1 << 16, "sigma={sigma}");
        assert_eq!(k.taps.len() as i64, 2 * k.radius + 1);
    }
}

#[test]
fn rejects_mismatched_buffers_and_bad_sigma() {
    assert!(blur_rgba8_premul(&[0u8; 4], 2, 2, 1, 1.0).is_err());
    assert!(blur_rgba8_premul(&[0u8; 16], 2, 2, 1, 0.0).is_err());
}

#[test]
fn css_radius_covers_three_sigma() {
    assert_eq!(radius_for_sigma(1.0), 3);
    assert_eq!(radius_for_sigma(0.0), 0);
    assert_eq!(radius_for_sigma(f32::NAN), 0);
}
