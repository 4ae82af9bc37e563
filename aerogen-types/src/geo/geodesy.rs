use std::marker::PhantomData;

use geodesy::prelude::*;

use crate::cartesian::NewCartesianPoint2d;
use crate::error::AerogenTypesError;
use crate::geo::point::NewGeoPoint;
use crate::geo::projection::Projection;

/// Projection backed by an operator of the `geodesy` crate, e.g. `utm zone=32`.
pub struct GeodesyProjection<In, Out> {
    context: Minimal,
    op: OpHandle,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> GeodesyProjection<In, Out> {
    /// Builds the projection from a `geodesy` operator definition.
    pub fn new(definition: &str) -> Result<Self, AerogenTypesError> {
        let mut context = Minimal::new();
        let op = context
            .op(definition)
            .map_err(|err| AerogenTypesError::Projection(format!("'{definition}': {err}")))?;
        Ok(Self {
            context,
            op,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        })
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection
    for GeodesyProjection<In, Out>
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let mut data = [Coor2D::geo(input.lat(), input.lon())];
        if let Err(err) = self.context.apply(self.op, Fwd, &mut data) {
            log::debug!("Forward projection of ({}, {}) failed: {err}", input.lat(), input.lon());
            return None;
        }

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(Out::new(data[0].0[0], data[0].0[1]))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let mut data = [Coor2D([input.x(), input.y()])];
        if let Err(err) = self.context.apply(self.op, Inv, &mut data) {
            log::debug!("Inverse projection of ({}, {}) failed: {err}", input.x(), input.y());
            return None;
        }

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(In::latlon(
            data[0].0[1].to_degrees(),
            data[0].0[0].to_degrees(),
        ))
    }
}
