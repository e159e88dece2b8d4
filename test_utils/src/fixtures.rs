use std::fmt::Write;

use rand::{seq::SliceRandom, Rng};

/// Shape of a generated profile.
#[derive(Copy, Clone)]
pub struct ProfileShape {
    pub packages: usize,
    pub files_per_package: usize,
    pub blocks_per_file: usize,

    /// How many extra copies of each block line to emit, as a re-run test
    /// binary would.
    pub duplicates: usize,
}

/// Generates a `mode: set` profile with the requested shape. Block lines are
/// shuffled so consumers can't rely on any ordering.
pub fn generate_profile(rng: &mut impl Rng, shape: ProfileShape) -> String {
    let mut lines = Vec::new();
    for package in 0..shape.packages {
        for file in 0..shape.files_per_package {
            for block in 0..shape.blocks_per_file {
                let start_line = block as u32 * 3 + 1;
                let num_statements: u32 = rng.gen_range(0..8);
                for _ in 0..=shape.duplicates {
                    let hit_count: u32 = rng.gen_range(0..2);
                    lines.push(format!(
                        "example.com/mod/pkg{package}/file{file}.go:{start_line}.2,{}.3 {num_statements} {hit_count}",
                        start_line + 2,
                    ));
                }
            }
        }
    }
    lines.shuffle(rng);

    let mut profile = String::from("mode: set\n");
    for line in lines {
        // Writing to a String can't fail
        let _ = writeln!(profile, "{line}");
    }
    profile
}
