use std::time::Instant;

use criterion::{criterion_group, criterion_main, Criterion};

use schip::{chip8::ChipSet, settings::Settings};

/// a tight loop touching the registers, the index register and the display
const LOOP_ROM: &[u8] = &[
    0xA0, 0x00, // 0x200: I = 0
    0x61, 0x00, // 0x202: V1 = 0
    0x62, 0x00, // 0x204: V2 = 0
    0xD1, 0x25, // 0x206: draw the glyph at (V1, V2)
    0x71, 0x08, // 0x208: V1 += 8
    0x12, 0x06, // 0x20A: jump back onto the draw
];

/// will setup the default configured chip with the loop program loaded
fn get_default_chip() -> ChipSet {
    let mut chip = ChipSet::new(Settings::default(), Instant::now());
    chip.load(LOOP_ROM)
        .expect("A panic happend during loading of the rom.");
    chip
}

pub fn cycle_bench(c: &mut Criterion) {
    let mut chip = get_default_chip();
    c.bench_function("cycle_bench", |b| {
        b.iter(|| {
            chip.next()
                .expect("A panic happend during the execution of the program.");
        });
    });
}

criterion_group!(benches, cycle_bench);
criterion_main!(benches);
