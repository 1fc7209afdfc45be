mod common;

use common::{starfield, Probe};
use starfield::context::Shader;
use starfield::shaders::ShaderStore;
use starfield::{CacheState, DrawContext, Error, Random, Size, Starfield, Target};

fn render(probe: &mut Probe, sf: &mut Starfield) {
    sf.render(probe, Target::SCREEN, Target::SCREEN).expect("render");
}

#[test_log::test]
fn same_seed_and_size_give_identical_images() {
    let size = Size::new(64, 48);
    let (mut a, _, mut sa) = starfield(size, 2, 3, "determinism");
    let (mut b, _, mut sb) = starfield(size, 2, 3, "determinism");
    render(&mut a, &mut sa);
    render(&mut b, &mut sb);

    let ia = a.inner.texture_image(sa.result_texture().unwrap()).unwrap();
    let ib = b.inner.texture_image(sb.result_texture().unwrap()).unwrap();
    assert_eq!(ia, ib);
    assert_eq!(a.inner.screen(), b.inner.screen());
}

#[test_log::test]
fn different_seeds_give_different_images() {
    let size = Size::new(48, 32);
    let (mut a, _, mut sa) = starfield(size, 1, 2, "one");
    let (mut b, _, mut sb) = starfield(size, 1, 2, "two");
    render(&mut a, &mut sa);
    render(&mut b, &mut sb);
    assert_ne!(a.inner.screen(), b.inner.screen());
}

#[test_log::test]
fn resize_regenerates_into_new_targets() {
    let (mut probe, _, mut sf) = starfield(Size::new(640, 480), 1, 1, "resize");
    assert_eq!(sf.state(&probe), CacheState::Stale);
    render(&mut probe, &mut sf);
    assert_eq!(sf.state(&probe), CacheState::Fresh);
    let first = sf.result_texture().unwrap();

    probe.inner.resize(Size::new(1280, 720));
    assert_eq!(sf.state(&probe), CacheState::Stale);
    render(&mut probe, &mut sf);
    assert_eq!(sf.state(&probe), CacheState::Fresh);

    let second = sf.result_texture().unwrap();
    assert_ne!(first, second);
    assert!(probe.inner.texture_image(first).is_none(), "old target released");
    let img = probe.inner.texture_image(second).unwrap();
    assert_eq!(img.dimensions(), (1280, 720));
    assert_eq!(sf.regenerations(), 2);
}

#[test_log::test]
fn unchanged_size_only_blits() {
    let (mut probe, _, mut sf) = starfield(Size::new(32, 24), 2, 4, "cache");
    render(&mut probe, &mut sf);
    let cached = sf.result_texture();
    probe.reset_counts();

    render(&mut probe, &mut sf);
    assert_eq!(probe.draws.len(), 1);
    assert_eq!(probe.count(Shader::Copy), 1);
    assert_eq!(probe.draws[0].destination, None);
    assert_eq!(probe.textures_created, 0);
    assert_eq!(sf.result_texture(), cached);
    assert_eq!(sf.regenerations(), 1);
}

#[test_log::test]
fn zero_passes_still_draw_stars_and_sun() {
    let (mut probe, _, mut sf) = starfield(Size::new(16, 16), 0, 0, "zero");
    render(&mut probe, &mut sf);

    let offscreen: Vec<_> = probe.draws.iter().filter(|d| d.destination.is_some()).collect();
    assert_eq!(offscreen.len(), 2, "point stars + sun");
    assert_eq!(offscreen[0].shader, Shader::Copy);
    assert_eq!(offscreen[1].shader, Shader::Star);
    assert_eq!(probe.count(Shader::Nebulae), 0);
    // plus the presentation copy
    assert_eq!(probe.draws.len(), 3);
    assert_eq!(sf.state(&probe), CacheState::Fresh);
}

#[test_log::test]
fn pass_counts_are_honoured() {
    let (mut probe, _, mut sf) = starfield(Size::new(16, 12), 3, 5, "counts");
    render(&mut probe, &mut sf);
    assert_eq!(probe.count(Shader::Nebulae), 3);
    // halo stars plus the sun
    assert_eq!(probe.count(Shader::Star), 6);
    // point stars plus presentation
    assert_eq!(probe.count(Shader::Copy), 2);
}

#[test_log::test]
fn effect_scale_follows_the_longest_edge() {
    let (mut small, _, mut s) = starfield(Size::new(512, 512), 2, 2, "scale");
    let (mut large, _, mut l) = starfield(Size::new(1024, 1024), 2, 2, "scale");
    render(&mut small, &mut s);
    render(&mut large, &mut l);

    let nebula = |p: &Probe| p.of(Shader::Nebulae).map(|d| d.float("u_scale").unwrap()).collect::<Vec<_>>();
    let (ns, nl) = (nebula(&small), nebula(&large));
    assert_eq!(ns.len(), 2);
    for (a, b) in ns.iter().zip(&nl) {
        assert_eq!(a / b, 2.0);
    }

    assert!(small.of(Shader::Star).all(|d| d.float("u_scale") == Some(512.0)));
    assert!(large.of(Shader::Star).all(|d| d.float("u_scale") == Some(1024.0)));
}

#[test_log::test]
fn rewinding_the_seed_on_resize_restores_the_image() {
    let a = Size::new(40, 30);
    let (mut probe, rng, mut sf) = starfield(a, 1, 3, "rewind");
    rng.borrow_mut().reset();
    render(&mut probe, &mut sf);
    let first = probe.inner.screen().clone();

    for size in [Size::new(50, 40), a] {
        probe.inner.resize(size);
        rng.borrow_mut().reset();
        render(&mut probe, &mut sf);
    }
    assert_eq!(probe.inner.screen(), &first);
}

#[test_log::test]
fn shader_compile_failure_is_fatal() {
    let mut probe = Probe::failing(Size::new(8, 8), Shader::Star);
    let err = ShaderStore::new(&mut probe).err();
    assert!(matches!(err, Some(Error::ShaderCompile { shader: Shader::Star, .. })));
    assert_eq!(probe.drawable_size(), Size::new(8, 8));
}

#[test_log::test]
fn release_leaves_nothing_behind() {
    let (mut probe, _, mut sf) = starfield(Size::new(20, 20), 1, 1, "release");
    render(&mut probe, &mut sf);
    probe.inner.resize(Size::new(24, 18));
    render(&mut probe, &mut sf);
    sf.release(&mut probe);
    assert_eq!(probe.inner.live_textures(), 0);
    assert_eq!(probe.inner.live_framebuffers(), 0);
}

#[test_log::test]
fn reseeding_swaps_in_a_working_starfield() {
    let size = Size::new(24, 16);
    let mut probe = Probe::new(size);
    let shaders = ShaderStore::new(&mut probe).unwrap();
    let mut sf = Starfield::new(&mut probe, &shaders, 1, 2, Random::shared("before")).unwrap();
    render(&mut probe, &mut sf);

    let next = Starfield::new(&mut probe, &shaders, 2, 1, Random::shared("after")).unwrap();
    std::mem::replace(&mut sf, next).release(&mut probe);
    assert_eq!(sf.state(&probe), CacheState::Stale);

    probe.reset_counts();
    render(&mut probe, &mut sf);
    assert_eq!(sf.state(&probe), CacheState::Fresh);
    assert_eq!(probe.count(Shader::Nebulae), 2);
    // new noise + point stars + the pair
    assert_eq!(probe.inner.live_textures(), 4);
}
