use criterion::{black_box, criterion_group, criterion_main, Criterion};
use molscope::geometry::{build_ribbon_mesh, create_sphere_mesh};
use molscope::options::GeometryOptions;
use molscope::structure::parse_structure_str;

/// Synthetic helix-ish chain: N, CA, C, O per residue.
fn synthetic_pdb(residues: usize) -> String {
    let mut text = String::new();
    let mut serial = 1;
    for r in 0..residues {
        let angle = r as f32 * 1.745;
        let (sin, cos) = angle.sin_cos();
        let base = [2.3 * cos, 2.3 * sin, r as f32 * 1.5];
        let residue = if r % 3 == 0 { "ALA" } else { "VAL" };
        for (k, (name, element)) in [("N", "N"), ("CA", "C"), ("C", "C"), ("O", "O")]
            .iter()
            .enumerate()
        {
            let offset = k as f32 * 0.4;
            text.push_str(&format!(
                "ATOM  {serial:>5} {name:<4} {residue:>3} A{resnum:>4}    \
                 {x:>8.3}{y:>8.3}{z:>8.3}{occ:>6.2}{b:>6.2}          {element:>2}\n",
                resnum = r + 1,
                x = base[0] + offset,
                y = base[1],
                z = base[2],
                occ = 1.0,
                b = 0.0,
            ));
            serial += 1;
        }
    }
    text
}

fn parse_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_structure");
    for residues in [100, 1_000, 5_000] {
        let text = synthetic_pdb(residues);
        group.bench_function(format!("{residues}_residues"), |b| {
            b.iter(|| black_box(parse_structure_str(black_box(&text))));
        });
    }
    group.finish();
}

fn sphere_benchmark(c: &mut Criterion) {
    c.bench_function("sphere_mesh_32", |b| {
        b.iter(|| black_box(create_sphere_mesh(1.0, black_box(32))));
    });
}

fn ribbon_benchmark(c: &mut Criterion) {
    let options = GeometryOptions::default();
    let mut group = c.benchmark_group("ribbon_mesh");
    for residues in [100, 1_000] {
        let structure = parse_structure_str(&synthetic_pdb(residues));
        group.bench_function(format!("{residues}_residues"), |b| {
            b.iter(|| black_box(build_ribbon_mesh(black_box(&structure.backbone), &options)));
        });
    }
    group.finish();
}

criterion_group!(benches, parse_benchmark, sphere_benchmark, ribbon_benchmark);
criterion_main!(benches);
