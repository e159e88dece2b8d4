use covpkg_rs::{collector::CoverageCollector, parsers::gocover, report};
use divan::Bencher;
use test_utils::{
    fixtures::{generate_profile, ProfileShape},
    rng::rng,
};

fn main() {
    divan::main();
}

const SHAPES: &[ProfileShape] = &[
    ProfileShape {
        packages: 10,
        files_per_package: 5,
        blocks_per_file: 20,
        duplicates: 0,
    },
    ProfileShape {
        packages: 200,
        files_per_package: 10,
        blocks_per_file: 50,
        duplicates: 2,
    },
];

#[divan::bench(args = [0, 1])]
fn parse_profile(bencher: Bencher, shape: usize) {
    let input = generate_profile(&mut rng(), SHAPES[shape]);
    bencher.bench(|| gocover::parse_profile(&input).unwrap());
}

// parsing is excluded so this only measures grouping, dedup and rendering
#[divan::bench(args = [0, 1])]
fn collect_and_render(bencher: Bencher, shape: usize) {
    let input = generate_profile(&mut rng(), SHAPES[shape]);
    let profile = gocover::parse_profile(&input).unwrap();

    bencher.bench(|| {
        let collector = CoverageCollector::new(vec![profile.clone()]);
        collector.validate().unwrap();
        report::render_text(&report::summarize(&collector.collect_packages()))
    });
}
