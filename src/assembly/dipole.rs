//! Assembly of dipole source terms
use crate::analytic::{
    DipolePotential, DipolePotentialDerivative, DipolePotentialDerivativeGrad,
    DipolePotentialGrad,
};
use crate::assembly::common::{check_mesh, check_range};
use crate::assembly::OperatorAssembler;
use crate::traits::{Mesh, Progress};
use crate::types::{AssemblyError, Vect3};
use log::info;
use rayon::prelude::*;

fn check_dipole(position: &Vect3, moment: &Vect3) -> Result<(), AssemblyError> {
    if position.is_finite() && moment.is_finite() {
        Ok(())
    } else {
        Err(AssemblyError::InvalidGeometry(format!(
            "dipole at {position:?} with moment {moment:?} is not finite"
        )))
    }
}

impl<P: Progress> OperatorAssembler<P> {
    /// Add the potential of a dipole, integrated over each triangle of a mesh, to
    /// `rhs[offset + t]`
    pub fn dipole_potential(
        &self,
        position: &Vect3,
        moment: &Vect3,
        mesh: &impl Mesh,
        rhs: &mut [f64],
        offset: usize,
    ) -> Result<(), AssemblyError> {
        check_mesh(mesh)?;
        check_dipole(position, moment)?;
        let ntriangles = mesh.number_of_triangles();
        check_range(rhs.len(), offset, ntriangles)?;
        let integrator = self.rhs_integrator()?;
        info!("Assembling dipole potential on {ntriangles} triangles at offset {offset}");

        let potential = DipolePotential::new(*position, *moment);
        let values = (0..ntriangles)
            .into_par_iter()
            .map(|t| integrator.integrate(&potential, &mesh.triangle_points(t)))
            .collect::<Vec<_>>();
        for (entry, value) in rhs[offset..offset + ntriangles].iter_mut().zip(values) {
            *entry += value;
        }
        Ok(())
    }

    /// Add the normal derivative of the potential of a dipole, tested with the hat function of
    /// each point of a mesh, to `rhs[offset + p]`
    pub fn dipole_potential_derivative(
        &self,
        position: &Vect3,
        moment: &Vect3,
        mesh: &impl Mesh,
        rhs: &mut [f64],
        offset: usize,
    ) -> Result<(), AssemblyError> {
        check_mesh(mesh)?;
        check_dipole(position, moment)?;
        check_range(rhs.len(), offset, mesh.number_of_points())?;
        let integrator = self.rhs_integrator()?;
        info!(
            "Assembling dipole potential derivative on {} points at offset {offset}",
            mesh.number_of_points()
        );

        let values = (0..mesh.number_of_triangles())
            .into_par_iter()
            .map(|t| {
                let derivative = DipolePotentialDerivative::new(*position, *moment, mesh, t);
                integrator.integrate(&derivative, &mesh.triangle_points(t))
            })
            .collect::<Vec<_>>();
        for (t, value) in values.iter().enumerate() {
            for (v, component) in mesh.triangle(t).vertices().iter().zip(value.to_array()) {
                rhs[offset + v] += component;
            }
        }
        Ok(())
    }

    /// Add the gradient with respect to the dipole position of [OperatorAssembler::dipole_potential]
    /// to `rhs[0]`, `rhs[1]` and `rhs[2]`
    pub fn dipole_potential_grad(
        &self,
        position: &Vect3,
        moment: &Vect3,
        mesh: &impl Mesh,
        rhs: [&mut [f64]; 3],
        offset: usize,
    ) -> Result<(), AssemblyError> {
        check_mesh(mesh)?;
        check_dipole(position, moment)?;
        let ntriangles = mesh.number_of_triangles();
        for r in &rhs {
            check_range(r.len(), offset, ntriangles)?;
        }
        let integrator = self.rhs_integrator()?;
        info!("Assembling dipole potential gradient on {ntriangles} triangles at offset {offset}");

        let gradient = DipolePotentialGrad::new(*position, *moment);
        let values = (0..ntriangles)
            .into_par_iter()
            .map(|t| integrator.integrate(&gradient, &mesh.triangle_points(t)))
            .collect::<Vec<_>>();
        for (d, r) in rhs.into_iter().enumerate() {
            for (entry, value) in r[offset..offset + ntriangles].iter_mut().zip(&values) {
                *entry += value[d];
            }
        }
        Ok(())
    }

    /// Add the gradient with respect to the dipole position of
    /// [OperatorAssembler::dipole_potential_derivative] to `rhs[0]`, `rhs[1]` and `rhs[2]`
    pub fn dipole_potential_derivative_grad(
        &self,
        position: &Vect3,
        moment: &Vect3,
        mesh: &impl Mesh,
        rhs: [&mut [f64]; 3],
        offset: usize,
    ) -> Result<(), AssemblyError> {
        check_mesh(mesh)?;
        check_dipole(position, moment)?;
        for r in &rhs {
            check_range(r.len(), offset, mesh.number_of_points())?;
        }
        let integrator = self.rhs_integrator()?;
        info!(
            "Assembling dipole potential derivative gradient on {} points at offset {offset}",
            mesh.number_of_points()
        );

        let values = (0..mesh.number_of_triangles())
            .into_par_iter()
            .map(|t| {
                let vertices = mesh.triangle_points(t);
                [0, 1, 2].map(|axis| {
                    let f = DipolePotentialDerivativeGrad::new(*position, *moment, mesh, t, axis);
                    integrator.integrate(&f, &vertices)
                })
            })
            .collect::<Vec<_>>();
        for (d, r) in rhs.into_iter().enumerate() {
            for (t, value) in values.iter().enumerate() {
                for (v, component) in mesh.triangle(t).vertices().iter().zip(value[d].to_array()) {
                    r[offset + v] += component;
                }
            }
        }
        Ok(())
    }
}
