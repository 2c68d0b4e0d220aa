use std::collections::HashSet;
use std::sync::OnceLock;

use neuquant::color_match::{best_index_l1, dist_l1};
use neuquant::image_io::{bgr_samples, mean_abs_error, remap, RgbFrame};
use neuquant::params::MIN_PICTURE_BYTES;
use neuquant::{NeuQuant, Palette, QuantError};

use image::{Rgb, RgbImage};
use proptest::prelude::*;

/// 带噪声的渐变图，xorshift 保证可复现
fn test_image(w: u32, h: u32) -> RgbImage {
    let mut state = 0x2545_f491u32;
    RgbImage::from_fn(w, h, |x, y| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let n = (state % 16) as u8;
        Rgb([
            ((x * 255 / w.max(1)) as u8).saturating_add(n),
            ((y * 255 / h.max(1)) as u8).saturating_sub(n),
            (((x + y) * 127 / (w + h).max(1)) as u8) ^ n,
        ])
    })
}

fn samples_of(img: &RgbImage) -> Vec<u8> {
    bgr_samples(&[RgbFrame { image: img.clone(), delay: 0 }])
}

fn shared() -> &'static NeuQuant {
    static NQ: OnceLock<NeuQuant> = OnceLock::new();
    NQ.get_or_init(|| NeuQuant::new(&samples_of(&test_image(96, 80)), 3).unwrap())
}

#[test]
fn tags_are_a_permutation() {
    let nq = shared();
    let tags: HashSet<u8> = nq.index().neurons().iter().map(|n| n.tag).collect();
    assert_eq!(tags.len(), 256);
    assert_eq!(nq.palette().len(), 256);
}

#[test]
fn lookup_is_total() {
    let nq = shared();
    for c0 in (0..=255u8).step_by(5) {
        for c1 in (0..=255u8).step_by(5) {
            for c2 in (0..=255u8).step_by(5) {
                let (_, d) = nq.lookup_with_distance(c0, c1, c2);
                assert!(d <= 765);
            }
        }
    }
}

#[test]
fn deterministic() {
    let samples = samples_of(&test_image(64, 64));
    let a = NeuQuant::new(&samples, 4).unwrap();
    let b = NeuQuant::new(&samples, 4).unwrap();
    assert_eq!(a.palette(), b.palette());
    assert_eq!(a.index().neurons(), b.index().neurons());
    assert_eq!(a.stats(), b.stats());
}

#[test]
fn single_color_maps_exactly() {
    let color = [12u8, 200, 77];
    let samples = color.repeat(MIN_PICTURE_BYTES);
    assert_eq!(samples.len(), 3 * MIN_PICTURE_BYTES);
    let nq = NeuQuant::new(&samples, 10).unwrap();
    let first = nq.lookup_with_distance(12, 200, 77);
    assert_eq!(first.1, 0);
    for _ in 0..10 {
        assert_eq!(nq.lookup_with_distance(12, 200, 77), first);
    }
}

#[test]
fn rate_boundaries() {
    let samples = samples_of(&test_image(64, 48));
    for rate in [1, 30] {
        let nq = NeuQuant::new(&samples, rate).unwrap();
        assert_eq!(nq.stats().sample_rate, rate);
        assert_eq!(nq.color_map().len(), 768);
    }
}

#[test]
fn rejects_invalid_input() {
    assert!(matches!(NeuQuant::new(&[], 10), Err(QuantError::EmptyInput)));
    assert!(matches!(NeuQuant::new(&[0; 10], 10), Err(QuantError::InvalidParameter(_))));
    assert!(matches!(NeuQuant::new(&[0; 9], 0), Err(QuantError::InvalidParameter(_))));
    assert!(matches!(NeuQuant::new(&[0; 9], 31), Err(QuantError::InvalidParameter(_))));
}

#[test]
fn concurrent_lookups_agree() {
    let nq = shared();
    let expected: Vec<u8> = (0..=255u8).map(|v| nq.lookup(v, 255 - v, v / 2)).collect();
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for v in 0..=255u8 {
                    assert_eq!(nq.lookup(v, 255 - v, v / 2), expected[v as usize]);
                }
            });
        }
    });
}

#[test]
fn tiled_input_with_scaled_rate_is_comparable() {
    let img = test_image(64, 64);
    let samples = samples_of(&img);
    let doubled = samples.repeat(2);

    let a = NeuQuant::new(&samples, 1).unwrap();
    let b = NeuQuant::new(&doubled, 2).unwrap();
    assert_eq!(a.stats().samples, b.stats().samples);

    let err_a = mean_abs_error(&img, &remap(&a, &img, true), &Palette::from_neuquant_bgr(&a)).unwrap();
    let err_b = mean_abs_error(&img, &remap(&b, &img, true), &Palette::from_neuquant_bgr(&b)).unwrap();
    assert!(err_b <= err_a * 2.0 + 8.0, "{err_a} vs {err_b}");
    assert!(err_a <= err_b * 2.0 + 8.0, "{err_a} vs {err_b}");
}

/// xorshift32 加缓升斜坡的固定样本流
fn fixed_stream(n: usize) -> Vec<u8> {
    let mut state = 0x9e37_79b9u32;
    (0..n)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (((i / 3) * 5 + (state & 63) as usize) & 255) as u8
        })
        .collect()
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325u64, |h, &b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3))
}

struct Golden {
    len: usize,
    rate: u32,
    map_hash: u64,
    head: [[u8; 3]; 4],
    last: [u8; 3],
    netindex: [(usize, usize); 5],
    lookups: [([u8; 3], u8, u32); 5],
}

// 由经典 NeuQuant 定点算法独立计算得到的结果
const GOLDEN: [Golden; 2] = [
    Golden {
        len: 600,
        rate: 7,
        map_hash: 0xf6e4_76bd_1131_286d,
        head: [[3, 10, 3], [3, 10, 4], [4, 11, 4], [4, 11, 5]],
        last: [239, 242, 241],
        netindex: [(0, 0), (64, 72), (128, 139), (200, 221), (255, 255)],
        lookups: [
            ([0, 0, 0], 0, 16),
            ([255, 255, 255], 255, 43),
            ([12, 200, 77], 38, 149),
            ([128, 64, 32], 16, 56),
            ([90, 90, 90], 78, 40),
        ],
    },
    Golden {
        len: 6000,
        rate: 3,
        map_hash: 0xe5ae_7abc_062c_e231,
        head: [[18, 11, 217], [20, 13, 222], [18, 11, 218], [18, 13, 213]],
        last: [231, 232, 12],
        netindex: [(0, 0), (64, 52), (128, 131), (200, 193), (255, 255)],
        lookups: [
            ([0, 0, 0], 42, 48),
            ([255, 255, 255], 194, 54),
            ([12, 200, 77], 12, 55),
            ([128, 64, 32], 56, 44),
            ([90, 90, 90], 83, 15),
        ],
    },
];

#[test]
fn matches_reference_vectors() {
    for g in &GOLDEN {
        let nq = NeuQuant::new(&fixed_stream(g.len), g.rate).unwrap();
        let map = nq.color_map();
        let pal = nq.palette();
        assert_eq!(&pal[..4], &g.head, "len {}", g.len);
        assert_eq!(pal[255], g.last, "len {}", g.len);
        assert_eq!(fnv1a(&map), g.map_hash, "len {}", g.len);
        for &(c1, pos) in &g.netindex {
            assert_eq!(nq.index().netindex()[c1], pos, "len {} netindex[{}]", g.len, c1);
        }
        for &([c0, c1, c2], tag, dist) in &g.lookups {
            assert_eq!(nq.lookup_with_distance(c0, c1, c2), (tag, dist), "len {} lookup {:?}", g.len, [c0, c1, c2]);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn fresh_handles_agree_with_brute_force(
        pixels in prop::collection::vec(any::<[u8; 3]>(), 1..900),
        rate in 1u32..=30,
        queries in prop::collection::vec(any::<[u8; 3]>(), 16),
    ) {
        let nq = NeuQuant::new(&pixels.concat(), rate).unwrap();
        let pal = nq.palette();
        for [c0, c1, c2] in queries {
            let (t, d) = nq.lookup_with_distance(c0, c1, c2);
            prop_assert_eq!(dist_l1([c0, c1, c2], pal[t as usize]), d);
            let bf = best_index_l1([c0, c1, c2], &pal);
            prop_assert_eq!(dist_l1([c0, c1, c2], pal[bf as usize]), d);
        }
    }
}

proptest! {
    #[test]
    fn lookup_distance_matches_brute_force(c0 in any::<u8>(), c1 in any::<u8>(), c2 in any::<u8>()) {
        let nq = shared();
        let pal = nq.palette();
        let (t, d) = nq.lookup_with_distance(c0, c1, c2);
        prop_assert_eq!(dist_l1([c0, c1, c2], pal[t as usize]), d);
        let bf = best_index_l1([c0, c1, c2], &pal);
        prop_assert_eq!(dist_l1([c0, c1, c2], pal[bf as usize]), d);
    }

    #[test]
    fn lookup_is_pure(c0 in any::<u8>(), c1 in any::<u8>(), c2 in any::<u8>()) {
        let nq = shared();
        prop_assert_eq!(nq.lookup(c0, c1, c2), nq.lookup(c0, c1, c2));
    }

    #[test]
    fn small_streams_always_build(pixels in prop::collection::vec(any::<[u8; 3]>(), 1..200), rate in 1u32..=30) {
        let samples: Vec<u8> = pixels.concat();
        let nq = NeuQuant::new(&samples, rate).unwrap();
        prop_assert_eq!(nq.stats().sample_rate, 1);
        let tags: HashSet<u8> = nq.index().neurons().iter().map(|n| n.tag).collect();
        prop_assert_eq!(tags.len(), 256);
    }
}
