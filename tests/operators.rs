use approx::*;
use meeg_bem::assembly::kernels::single_layer;
use meeg_bem::grid::shapes::{regular_sphere, screen_triangles, sphere};
use meeg_bem::grid::FlatTriangleGrid;
use meeg_bem::matrix::{scale_block, DenseMatrix, SymmetricMatrix};
use meeg_bem::quadrature::{AdaptiveIntegrator, Integrator};
use meeg_bem::traits::{Integrand, Matrix, Mesh, NoProgress};
use meeg_bem::types::{KernelVariant, QuadraturePolicy, Storage, Vect3};
use meeg_bem::{AssemblyOptions, OperatorAssembler};
use paste::paste;
use rand::prelude::*;
use std::collections::HashMap;

fn assembler(options: AssemblyOptions) -> OperatorAssembler<NoProgress> {
    OperatorAssembler::with_progress(options, NoProgress)
}

/// A symmetric matrix that fails if an entry below the diagonal is written
struct UpperTriangleMatrix {
    size: usize,
    entries: HashMap<(usize, usize), f64>,
}

impl UpperTriangleMatrix {
    fn new(size: usize) -> Self {
        Self {
            size,
            entries: HashMap::new(),
        }
    }
}

impl Matrix for UpperTriangleMatrix {
    fn shape(&self) -> [usize; 2] {
        [self.size, self.size]
    }
    fn storage(&self) -> Storage {
        Storage::Symmetric
    }
    fn get(&self, row: usize, column: usize) -> f64 {
        let key = (row.min(column), row.max(column));
        self.entries.get(&key).copied().unwrap_or(0.0)
    }
    fn set(&mut self, row: usize, column: usize, value: f64) {
        assert!(row <= column, "wrote ({row}, {column})");
        self.entries.insert((row, column), value);
    }
    fn add(&mut self, row: usize, column: usize, value: f64) {
        assert!(row <= column, "wrote ({row}, {column})");
        *self.entries.entry((row, column)).or_insert(0.0) += value;
    }
}

#[test]
fn test_same_mesh_writes_upper_triangle() {
    let grid = regular_sphere(1);
    let a = assembler(AssemblyOptions::default());
    let nt = grid.number_of_triangles();
    let np = grid.number_of_points();

    let mut s = UpperTriangleMatrix::new(nt);
    a.single_layer(&grid, &grid, &mut s, [0, 0]).unwrap();
    assert_eq!(s.entries.len(), nt * (nt + 1) / 2);

    let mut n = UpperTriangleMatrix::new(np);
    a.hypersingular(&grid, &grid, &mut n, [0, 0], None).unwrap();
    assert_eq!(n.entries.len(), np * (np + 1) / 2);
}

struct InverseDistance(Vect3);
impl Integrand for InverseDistance {
    type Output = f64;
    fn evaluate(&self, x: &Vect3) -> f64 {
        1.0 / (*x - self.0).norm()
    }
}

struct InnerIntegral<'a> {
    integrator: &'a AdaptiveIntegrator,
    vertices: [Vect3; 3],
}
impl Integrand for InnerIntegral<'_> {
    type Output = f64;
    fn evaluate(&self, x: &Vect3) -> f64 {
        self.integrator
            .integrate(&InverseDistance(*x), &self.vertices)
    }
}

fn random_triangle(rng: &mut StdRng, shift: Vect3) -> [Vect3; 3] {
    let base = [
        Vect3::new(0.0, 0.0, 0.0),
        Vect3::new(1.0, 0.0, 0.0),
        Vect3::new(0.5, 0.8, 0.0),
    ];
    base.map(|v| {
        v + shift
            + Vect3::new(
                rng.gen_range(-0.2..0.2),
                rng.gen_range(-0.2..0.2),
                rng.gen_range(-0.2..0.2),
            )
    })
}

#[test]
fn test_single_layer_matches_double_quadrature() {
    let mut rng = StdRng::seed_from_u64(2);
    let reference = AdaptiveIntegrator::new(3, 1e-12).unwrap();
    let integrator = Integrator::new(3, QuadraturePolicy::Adaptive { tolerance: 1e-10 }).unwrap();
    for _ in 0..10 {
        let v1 = random_triangle(&mut rng, Vect3::new(0.0, 0.0, 0.0));
        let v2 = random_triangle(&mut rng, Vect3::new(4.0, 1.0, -2.0));
        let m1 = FlatTriangleGrid::new(v1.to_vec(), &[[0, 1, 2]]).unwrap();
        let m2 = FlatTriangleGrid::new(v2.to_vec(), &[[0, 1, 2]]).unwrap();

        let expected = reference.integrate(
            &InnerIntegral {
                integrator: &reference,
                vertices: v1,
            },
            &v2,
        );
        assert_relative_eq!(
            single_layer(&m1, 0, &m2, 0, &integrator),
            expected,
            max_relative = 1e-4
        );
    }
}

#[test]
fn test_single_layer_diagonal_is_positive() {
    let grid = sphere(2, 3.0, Vect3::new(1.0, 0.0, 0.0));
    let a = assembler(AssemblyOptions::default());
    let nt = grid.number_of_triangles();
    let mut s = SymmetricMatrix::new(nt);
    a.single_layer(&grid, &grid, &mut s, [0, 0]).unwrap();
    for i in 0..nt {
        assert!(s.get(i, i) > 0.0);
        for j in 0..nt {
            assert!(s.get(i, j) > 0.0);
        }
    }
}

#[test]
fn test_double_layer_variants_agree() {
    let inner = regular_sphere(1);
    let outer = sphere(1, 1.5, Vect3::new(0.0, 0.0, 0.0));
    let mut options = AssemblyOptions::default();
    options.set_lhs_quadrature(QuadraturePolicy::Fixed);
    let mut a = assembler(options);

    for (m1, m2) in [(&inner, &inner), (&inner, &outer), (&outer, &inner)] {
        let shape = [m1.number_of_triangles(), m2.number_of_points()];
        a.options_mut()
            .set_operator_d_variant(KernelVariant::Optimized);
        let mut optimized = DenseMatrix::new(shape[0], shape[1]);
        a.double_layer(m1, m2, &mut optimized, [0, 0]).unwrap();
        a.options_mut()
            .set_operator_d_variant(KernelVariant::Reference);
        let mut reference = DenseMatrix::new(shape[0], shape[1]);
        a.double_layer(m1, m2, &mut reference, [0, 0]).unwrap();

        for (o, r) in optimized.data().iter().zip(reference.data()) {
            assert_relative_eq!(o, r, epsilon = 1e-12, max_relative = 1e-10);
        }
    }
}

#[test]
fn test_double_layer_row_sums() {
    // The double layer of a constant on a closed surface is -2π on the surface and -4π inside
    let grid = regular_sphere(2);
    let inside = sphere(1, 0.5, Vect3::new(0.1, 0.0, -0.1));
    let a = assembler(AssemblyOptions::default());

    let mut d = DenseMatrix::new(inside.number_of_triangles(), grid.number_of_points());
    a.double_layer(&inside, &grid, &mut d, [0, 0]).unwrap();
    for t in 0..inside.number_of_triangles() {
        let sum = (0..grid.number_of_points()).map(|p| d.get(t, p)).sum::<f64>();
        assert_relative_eq!(
            sum,
            -4.0 * std::f64::consts::PI * inside.triangle(t).area(),
            max_relative = 1e-10
        );
    }

    let mut d = DenseMatrix::new(grid.number_of_triangles(), grid.number_of_points());
    a.double_layer(&grid, &grid, &mut d, [0, 0]).unwrap();
    for t in 0..grid.number_of_triangles() {
        let sum = (0..grid.number_of_points()).map(|p| d.get(t, p)).sum::<f64>();
        assert_relative_eq!(
            sum,
            -2.0 * std::f64::consts::PI * grid.triangle(t).area(),
            max_relative = 1e-2
        );
    }
}

macro_rules! create_matrix {
    (Dense, $size:expr) => {
        DenseMatrix::new($size, $size)
    };
    (Symmetric, $size:expr) => {
        SymmetricMatrix::new($size)
    };
}

macro_rules! hypersingular_tests {
    ($($storage:ident),+) => {
    $(
        paste! {
            #[test]
            fn [<test_hypersingular_precomputed_single_layer_ $storage:lower>]() {
                let grid = regular_sphere(1);
                let a = assembler(AssemblyOptions::default());
                let nt = grid.number_of_triangles();
                let np = grid.number_of_points();

                let mut precomputed = create_matrix!($storage, nt + np);
                a.single_layer(&grid, &grid, &mut precomputed, [0, 0]).unwrap();
                a.hypersingular(&grid, &grid, &mut precomputed, [nt, nt], Some([0, 0]))
                    .unwrap();

                let mut on_the_fly = create_matrix!($storage, np);
                a.hypersingular(&grid, &grid, &mut on_the_fly, [0, 0], None).unwrap();

                for i in 0..np {
                    for j in 0..np {
                        assert_relative_eq!(
                            precomputed.get(nt + i, nt + j),
                            on_the_fly.get(i, j),
                            epsilon = 1e-14,
                            max_relative = 1e-12
                        );
                    }
                }
            }

            #[test]
            fn [<test_hypersingular_variants_agree_ $storage:lower>]() {
                let grid = regular_sphere(1);
                let np = grid.number_of_points();
                let mut options = AssemblyOptions::default();

                options.set_operator_n_variant(KernelVariant::Optimized);
                let mut optimized = create_matrix!($storage, np);
                assembler(options)
                    .hypersingular(&grid, &grid, &mut optimized, [0, 0], None)
                    .unwrap();

                options.set_operator_n_variant(KernelVariant::Reference);
                let mut reference = create_matrix!($storage, np);
                assembler(options)
                    .hypersingular(&grid, &grid, &mut reference, [0, 0], None)
                    .unwrap();

                for i in 0..np {
                    for j in 0..np {
                        assert_relative_eq!(
                            optimized.get(i, j),
                            reference.get(i, j),
                            epsilon = 1e-12,
                            max_relative = 1e-10
                        );
                    }
                }
            }
        }
    )*
    };
}

hypersingular_tests!(Dense, Symmetric);

#[test]
fn test_hypersingular_annihilates_constants() {
    let grid = regular_sphere(1);
    let np = grid.number_of_points();
    let mut n = SymmetricMatrix::new(np);
    assembler(AssemblyOptions::default())
        .hypersingular(&grid, &grid, &mut n, [0, 0], None)
        .unwrap();
    let scale = n.get(0, 0).abs();
    for i in 0..np {
        let sum = (0..np).map(|j| n.get(i, j)).sum::<f64>();
        assert!(sum.abs() < 1e-10 * scale);
    }
}

#[test]
fn test_p1p0_total_is_surface_area() {
    let grid = sphere(1, 2.0, Vect3::new(0.0, 0.0, 0.0));
    let nt = grid.number_of_triangles();
    let np = grid.number_of_points();
    let mut mat = DenseMatrix::new(nt, np);
    assembler(AssemblyOptions::default())
        .p1p0(&grid, &mut mat, [0, 0])
        .unwrap();
    let area = (0..nt).map(|t| grid.triangle(t).area()).sum::<f64>();
    assert_relative_eq!(mat.data().iter().sum::<f64>(), area, max_relative = 1e-12);
    for p in 0..np {
        let column = (0..nt).map(|t| mat.get(t, p)).sum::<f64>();
        let expected = grid
            .triangles_for_point(p)
            .iter()
            .map(|t| grid.triangle(*t).area() / 3.0)
            .sum::<f64>();
        assert_relative_eq!(column, expected, max_relative = 1e-12);
    }
}

#[test]
fn test_ferguson_of_constant_is_zero() {
    let grid = regular_sphere(1);
    let np = grid.number_of_points();
    let mut mat = DenseMatrix::new(3, np);
    let a = assembler(AssemblyOptions::default());
    for x in [Vect3::new(0.1, 0.2, 0.3), Vect3::new(3.0, -1.0, 2.0)] {
        a.ferguson(&x, &grid, &mut mat, [0, 0]).unwrap();
    }
    let scale = mat.data().iter().map(|v| v.abs()).fold(0.0, f64::max);
    assert!(scale > 0.0);
    for d in 0..3 {
        let sum = (0..np).map(|p| mat.get(d, p)).sum::<f64>();
        assert!(sum.abs() < 1e-12 * scale * np as f64);
    }
}

#[test]
fn test_ferguson_accumulates() {
    let grid = regular_sphere(0);
    let np = grid.number_of_points();
    let a = assembler(AssemblyOptions::default());
    let x = Vect3::new(0.0, 0.5, 2.0);

    let mut once = DenseMatrix::new(4, np + 1);
    a.ferguson(&x, &grid, &mut once, [1, 1]).unwrap();
    let mut twice = DenseMatrix::new(4, np + 1);
    a.ferguson(&x, &grid, &mut twice, [1, 1]).unwrap();
    a.ferguson(&x, &grid, &mut twice, [1, 1]).unwrap();

    for p in 0..np + 1 {
        assert_eq!(once.get(0, p), 0.0);
        assert_eq!(once.get(p.min(3), 0), 0.0);
    }
    for (o, t) in once.data().iter().zip(twice.data()) {
        assert_relative_eq!(2.0 * o, t, max_relative = 1e-14);
    }
}

#[test]
fn test_internal_potentials_of_sphere() {
    // A unit density on the unit sphere has potential 4π inside; its double layer is -4π
    let grid = regular_sphere(3);
    let points = [
        Vect3::new(0.0, 0.0, 0.0),
        Vect3::new(0.3, -0.2, 0.1),
        Vect3::new(0.0, 0.4, 0.0),
    ];
    let a = assembler(AssemblyOptions::default());

    let mut s = DenseMatrix::new(points.len(), grid.number_of_triangles());
    a.single_layer_internal(&grid, &points, &mut s, [0, 0])
        .unwrap();
    let mut d = DenseMatrix::new(points.len(), grid.number_of_points());
    a.double_layer_internal(&grid, &points, &mut d, [0, 0])
        .unwrap();

    for i in 0..points.len() {
        let potential = (0..grid.number_of_triangles())
            .map(|t| s.get(i, t))
            .sum::<f64>();
        assert_relative_eq!(potential, 4.0 * std::f64::consts::PI, max_relative = 2e-2);
        let double_layer = (0..grid.number_of_points())
            .map(|p| d.get(i, p))
            .sum::<f64>();
        assert_relative_eq!(
            double_layer,
            -4.0 * std::f64::consts::PI,
            max_relative = 1e-10
        );
    }
}

#[test]
fn test_dipole_potential_far_away() {
    let grid = screen_triangles(2);
    let nt = grid.number_of_triangles();
    let position = Vect3::new(0.5, 0.5, -20.0);
    let moment = Vect3::new(0.0, 0.0, 1.0);
    let a = assembler(AssemblyOptions::default());

    let mut rhs = vec![0.0; nt];
    a.dipole_potential(&position, &moment, &grid, &mut rhs, 0)
        .unwrap();
    for (t, value) in rhs.iter().enumerate() {
        let [v0, v1, v2] = grid.triangle_points(t);
        let r = (v0 + v1 + v2) / 3.0 - position;
        let expected = grid.triangle(t).area() * moment.dot(&r) / r.norm().powi(3);
        assert_relative_eq!(*value, expected, max_relative = 1e-2);
    }

    let first = rhs.clone();
    a.dipole_potential(&position, &moment, &grid, &mut rhs, 0)
        .unwrap();
    for (f, v) in first.iter().zip(&rhs) {
        assert_relative_eq!(2.0 * f, v, max_relative = 1e-14);
    }
}

#[test]
fn test_scale_symmetric_single_layer() {
    let grid = regular_sphere(1);
    let nt = grid.number_of_triangles();
    let a = assembler(AssemblyOptions::default());

    let mut dense = DenseMatrix::new(nt, nt);
    a.single_layer(&grid, &grid, &mut dense, [0, 0]).unwrap();
    let mut symmetric = SymmetricMatrix::new(nt);
    a.single_layer(&grid, &grid, &mut symmetric, [0, 0])
        .unwrap();

    scale_block(&mut dense, [0, 0], [nt, nt], -0.5).unwrap();
    scale_block(&mut symmetric, [0, 0], [nt, nt], -0.5).unwrap();
    for i in 0..nt {
        for j in 0..nt {
            assert_relative_eq!(dense.get(i, j), symmetric.get(i, j), max_relative = 1e-14);
            assert!(dense.get(i, j) < 0.0);
        }
    }
}
