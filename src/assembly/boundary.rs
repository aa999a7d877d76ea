//! Assembly of boundary operators
use crate::assembly::common::{
    assemble_in_batches, check_block, check_mesh, check_no_overlap, equal_meshes, MatrixEntries,
    WriteMode,
};
use crate::assembly::kernels::{
    double_layer_internal, double_layer_point, double_layer_triangle, ferguson, hypersingular,
    p1p0, single_layer_internal, SingleLayerEvaluator,
};
use crate::assembly::OperatorAssembler;
use crate::traits::{Matrix, Mesh, Progress};
use crate::types::{AssemblyError, KernelVariant, Storage, Vect3};
use log::info;

/// Values to be added to the three columns of the vertices of a triangle, in one row
type TripleEntries = Vec<(usize, [usize; 3], Vect3)>;

fn write_triples(mat: &mut impl Matrix, entries: TripleEntries) {
    for (row, columns, values) in entries {
        mat.accumulate_triple(row, columns, values.to_array());
    }
}

fn check_points(points: &[Vect3]) -> Result<(), AssemblyError> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(i) => Err(AssemblyError::InvalidGeometry(format!(
            "internal point {i} has non-finite coordinates"
        ))),
        None => Ok(()),
    }
}

impl<P: Progress> OperatorAssembler<P> {
    /// Assemble the single layer operator between the triangles of two meshes.
    ///
    /// Entry `(offsets[0] + i, offsets[1] + j)` is set to `∫_{T_j} ∫_{T_i} 1/|x - y| dy dx` for
    /// triangle `i` of `mesh1` and triangle `j` of `mesh2`.
    ///
    /// If both meshes are the same object, only entries with `i <= j` are computed. The mirrored
    /// entries are written for general storage; symmetric storage requires equal offsets.
    pub fn single_layer<M: Matrix + Sync>(
        &self,
        mesh1: &impl Mesh,
        mesh2: &impl Mesh,
        mat: &mut M,
        offsets: [usize; 2],
    ) -> Result<(), AssemblyError> {
        check_mesh(mesh1)?;
        check_mesh(mesh2)?;
        let same = equal_meshes(mesh1, mesh2);
        let block = [mesh1.number_of_triangles(), mesh2.number_of_triangles()];
        check_block(mat, offsets, block, same)?;
        let integrator = self.lhs_integrator()?;
        let mirror = same && mat.storage() == Storage::General;
        info!(
            "Assembling single layer operator: {} x {} block at {offsets:?}",
            block[0], block[1]
        );

        assemble_in_batches(
            mat,
            block[0],
            self.options.batch_size(),
            &self.progress,
            |_, i| {
                let mut evaluator = SingleLayerEvaluator::new(mesh1, &integrator);
                let first = if same { i } else { 0 };
                let mut entries = MatrixEntries::new_known_size(2 * (block[1] - first));
                for j in first..block[1] {
                    let value = evaluator.value(i, mesh2, j);
                    entries.push(offsets[0] + i, offsets[1] + j, value);
                    if mirror && j != i {
                        entries.push(offsets[0] + j, offsets[1] + i, value);
                    }
                }
                entries
            },
            |m, entries: MatrixEntries| entries.write_into(m, WriteMode::Assign),
        );
        Ok(())
    }

    /// Assemble the double layer operator between the triangles of `mesh1` and the hat functions
    /// of the points of `mesh2`.
    ///
    /// With [KernelVariant::Optimized] the contributions of each triangle of `mesh2` are added to
    /// the block, which must be zero beforehand. With [KernelVariant::Reference] the entries of
    /// the block are overwritten.
    pub fn double_layer<M: Matrix + Sync>(
        &self,
        mesh1: &impl Mesh,
        mesh2: &impl Mesh,
        mat: &mut M,
        offsets: [usize; 2],
    ) -> Result<(), AssemblyError> {
        check_mesh(mesh1)?;
        check_mesh(mesh2)?;
        let block = [mesh1.number_of_triangles(), mesh2.number_of_points()];
        check_block(mat, offsets, block, false)?;
        let integrator = self.lhs_integrator()?;
        let variant = self.options.operator_d_variant();
        info!(
            "Assembling double layer operator ({variant:?}): {} x {} block at {offsets:?}",
            block[0], block[1]
        );

        match variant {
            KernelVariant::Optimized => assemble_in_batches(
                mat,
                block[0],
                self.options.batch_size(),
                &self.progress,
                |_, i| {
                    (0..mesh2.number_of_triangles())
                        .map(|t2| {
                            let columns = mesh2.triangle(t2).vertices().map(|v| offsets[1] + v);
                            let values = double_layer_triangle(mesh1, i, mesh2, t2, &integrator);
                            (offsets[0] + i, columns, values)
                        })
                        .collect::<TripleEntries>()
                },
                write_triples,
            ),
            KernelVariant::Reference => assemble_in_batches(
                mat,
                block[0],
                self.options.batch_size(),
                &self.progress,
                |_, i| {
                    let mut entries = MatrixEntries::new_known_size(block[1]);
                    for p2 in 0..block[1] {
                        let value = double_layer_point(mesh1, i, mesh2, p2, &integrator);
                        entries.push(offsets[0] + i, offsets[1] + p2, value);
                    }
                    entries
                },
                |m, entries: MatrixEntries| entries.write_into(m, WriteMode::Assign),
            ),
        }
        Ok(())
    }

    /// Assemble the hypersingular operator between the hat functions of the points of two
    /// meshes.
    ///
    /// If `single_layer_block` is given, the single layer operator between the same two meshes
    /// must already be assembled in `mat` with those offsets, and its entries are used instead
    /// of being recomputed. The two blocks must not overlap.
    ///
    /// If both meshes are the same object, only entries with `i <= j` are computed, as for
    /// [OperatorAssembler::single_layer].
    pub fn hypersingular<M: Matrix + Sync>(
        &self,
        mesh1: &impl Mesh,
        mesh2: &impl Mesh,
        mat: &mut M,
        offsets: [usize; 2],
        single_layer_block: Option<[usize; 2]>,
    ) -> Result<(), AssemblyError> {
        check_mesh(mesh1)?;
        check_mesh(mesh2)?;
        let same = equal_meshes(mesh1, mesh2);
        let block = [mesh1.number_of_points(), mesh2.number_of_points()];
        check_block(mat, offsets, block, same)?;
        if let Some(s_offsets) = single_layer_block {
            check_no_overlap(
                mat,
                s_offsets,
                [mesh1.number_of_triangles(), mesh2.number_of_triangles()],
                offsets,
                block,
            )?;
        }
        let integrator = self.lhs_integrator()?;
        let variant = self.options.operator_n_variant();
        let mirror = same && mat.storage() == Storage::General;
        info!(
            "Assembling hypersingular operator ({variant:?}): {} x {} block at {offsets:?}",
            block[0], block[1]
        );

        assemble_in_batches(
            mat,
            block[0],
            self.options.batch_size(),
            &self.progress,
            |view, i| {
                let mut evaluator = SingleLayerEvaluator::new(mesh1, &integrator);
                // On a single mesh the pair (t1, t2) with t1 > t2 is integrated as (t2, t1), as
                // in the single layer assembly
                let mut transposed = SingleLayerEvaluator::new(mesh1, &integrator);
                let first = if same { i } else { 0 };
                let mut entries = MatrixEntries::new_known_size(2 * (block[1] - first));
                for j in first..block[1] {
                    let value = match single_layer_block {
                        Some(s) => hypersingular(mesh1, i, mesh2, j, variant, |t1, t2| {
                            view.get(s[0] + t1, s[1] + t2)
                        }),
                        None => hypersingular(mesh1, i, mesh2, j, variant, |t1, t2| {
                            if same && t1 > t2 {
                                transposed.value(t2, mesh1, t1)
                            } else {
                                evaluator.value(t1, mesh2, t2)
                            }
                        }),
                    };
                    entries.push(offsets[0] + i, offsets[1] + j, value);
                    if mirror && j != i {
                        entries.push(offsets[0] + j, offsets[1] + i, value);
                    }
                }
                entries
            },
            |m, entries: MatrixEntries| entries.write_into(m, WriteMode::Assign),
        );
        Ok(())
    }

    /// Assemble the P1P0 coupling between the triangles and the hat functions of a mesh
    ///
    /// Entry `(offsets[0] + t, offsets[1] + p)` is set to `area(t) / 3` if `p` is a vertex of
    /// `t`, and to zero otherwise.
    pub fn p1p0<M: Matrix + Sync>(
        &self,
        mesh: &impl Mesh,
        mat: &mut M,
        offsets: [usize; 2],
    ) -> Result<(), AssemblyError> {
        check_mesh(mesh)?;
        let block = [mesh.number_of_triangles(), mesh.number_of_points()];
        check_block(mat, offsets, block, false)?;
        info!(
            "Assembling P1P0 operator: {} x {} block at {offsets:?}",
            block[0], block[1]
        );

        assemble_in_batches(
            mat,
            block[0],
            self.options.batch_size(),
            &self.progress,
            |_, t| {
                let mut entries = MatrixEntries::new_known_size(block[1]);
                for p in 0..block[1] {
                    entries.push(offsets[0] + t, offsets[1] + p, p1p0(mesh, t, p));
                }
                entries
            },
            |m, entries: MatrixEntries| entries.write_into(m, WriteMode::Assign),
        );
        Ok(())
    }

    /// Assemble the Ferguson operator of a mesh at a point
    ///
    /// The three components of the entry of each hat function are added to rows `offsets[0]`,
    /// `offsets[0] + 1` and `offsets[0] + 2` of the column of its point.
    pub fn ferguson<M: Matrix + Sync>(
        &self,
        x: &Vect3,
        mesh: &impl Mesh,
        mat: &mut M,
        offsets: [usize; 2],
    ) -> Result<(), AssemblyError> {
        check_mesh(mesh)?;
        check_points(std::slice::from_ref(x))?;
        let npoints = mesh.number_of_points();
        check_block(mat, offsets, [3, npoints], false)?;
        info!("Assembling Ferguson operator: 3 x {npoints} block at {offsets:?}");

        assemble_in_batches(
            mat,
            npoints,
            self.options.batch_size(),
            &self.progress,
            |_, p| {
                let value = ferguson(x, mesh, p);
                let mut entries = MatrixEntries::new_known_size(3);
                for d in 0..3 {
                    entries.push(offsets[0] + d, offsets[1] + p, value[d]);
                }
                entries
            },
            |m, entries: MatrixEntries| entries.write_into(m, WriteMode::Accumulate),
        );
        Ok(())
    }

    /// Assemble the single layer potentials of the triangles of a mesh at a set of points
    ///
    /// Entry `(offsets[0] + i, offsets[1] + t)` is set to the potential of triangle `t` at
    /// `points[i]`.
    pub fn single_layer_internal<M: Matrix + Sync>(
        &self,
        mesh: &impl Mesh,
        points: &[Vect3],
        mat: &mut M,
        offsets: [usize; 2],
    ) -> Result<(), AssemblyError> {
        check_mesh(mesh)?;
        check_points(points)?;
        let block = [points.len(), mesh.number_of_triangles()];
        check_block(mat, offsets, block, false)?;
        info!(
            "Assembling internal single layer operator: {} x {} block at {offsets:?}",
            block[0], block[1]
        );

        assemble_in_batches(
            mat,
            block[0],
            self.options.batch_size(),
            &self.progress,
            |_, i| {
                let mut entries = MatrixEntries::new_known_size(block[1]);
                for t in 0..block[1] {
                    let value = single_layer_internal(mesh, t, &points[i]);
                    entries.push(offsets[0] + i, offsets[1] + t, value);
                }
                entries
            },
            |m, entries: MatrixEntries| entries.write_into(m, WriteMode::Assign),
        );
        Ok(())
    }

    /// Assemble the double layer potentials of the hat functions of a mesh at a set of points
    ///
    /// The contributions of every triangle are added to the block, which must be zero
    /// beforehand.
    pub fn double_layer_internal<M: Matrix + Sync>(
        &self,
        mesh: &impl Mesh,
        points: &[Vect3],
        mat: &mut M,
        offsets: [usize; 2],
    ) -> Result<(), AssemblyError> {
        check_mesh(mesh)?;
        check_points(points)?;
        let block = [points.len(), mesh.number_of_points()];
        check_block(mat, offsets, block, false)?;
        info!(
            "Assembling internal double layer operator: {} x {} block at {offsets:?}",
            block[0], block[1]
        );

        assemble_in_batches(
            mat,
            block[0],
            self.options.batch_size(),
            &self.progress,
            |_, i| {
                (0..mesh.number_of_triangles())
                    .map(|t| {
                        let columns = mesh.triangle(t).vertices().map(|v| offsets[1] + v);
                        (
                            offsets[0] + i,
                            columns,
                            double_layer_internal(mesh, t, &points[i]),
                        )
                    })
                    .collect::<TripleEntries>()
            },
            write_triples,
        );
        Ok(())
    }
}
