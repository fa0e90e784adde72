//! Quantity types used across heatnet and their constructors.

use uom::si::f64::{
    Length as UomLength, MassDensity as UomMassDensity, MassRate as UomMassRate,
    Power as UomPower, TemperatureInterval as UomTemperatureInterval,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type TempInterval = UomTemperatureInterval;
pub type Temperature = UomThermodynamicTemperature;

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;

/// Kinematic viscosity [m²/s].
pub type KinViscosity = f64;

/// Thermal conductivity [W/(m·K)].
pub type Conductivity = f64;

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn deg_c(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

/// Temperature difference in kelvin.
#[inline]
pub fn delta_k(v: f64) -> TempInterval {
    use uom::si::temperature_interval::kelvin;
    TempInterval::new::<kelvin>(v)
}

/// Celsius reading of an absolute temperature.
#[inline]
pub fn to_deg_c(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}
