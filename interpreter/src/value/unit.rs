use std::{f64::consts, fmt::Display};

use itertools::Itertools;

use super::Runtime;

/// Exponents of the base dimensions: length, mass, time, temperature, data, angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Dimensions([i8; 6]);

impl Dimensions {
    pub const NONE: Dimensions = Dimensions([0; 6]);
    pub const ANGLE: Dimensions = Dimensions([0, 0, 0, 0, 0, 1]);

    const fn new(length: i8, mass: i8, time: i8, temperature: i8, data: i8, angle: i8) -> Self {
        Dimensions([length, mass, time, temperature, data, angle])
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Self::NONE
    }

    /// `None` once any exponent leaves the `i8` range.
    fn checked_add(self, rhs: Dimensions) -> Option<Dimensions> {
        let mut sum = self;
        for (a, b) in sum.0.iter_mut().zip(rhs.0) {
            *a = a.checked_add(b)?;
        }
        Some(sum)
    }

    fn checked_mul(self, rhs: i32) -> Option<Dimensions> {
        let mut product = self;
        for a in product.0.iter_mut() {
            *a = i8::try_from((*a as i32).checked_mul(rhs)?).ok()?;
        }
        Some(product)
    }
}

#[derive(Debug, PartialEq)]
pub struct UnitDef {
    pub symbol: &'static str,
    aliases: &'static [&'static str],
    dimensions: Dimensions,
    scale: f64,
}

const fn def(
    symbol: &'static str,
    aliases: &'static [&'static str],
    dimensions: Dimensions,
    scale: f64,
) -> UnitDef {
    UnitDef {
        symbol,
        aliases,
        dimensions,
        scale,
    }
}

const LENGTH: Dimensions = Dimensions::new(1, 0, 0, 0, 0, 0);
const AREA: Dimensions = Dimensions::new(2, 0, 0, 0, 0, 0);
const VOLUME: Dimensions = Dimensions::new(3, 0, 0, 0, 0, 0);
const MASS: Dimensions = Dimensions::new(0, 1, 0, 0, 0, 0);
const TIME: Dimensions = Dimensions::new(0, 0, 1, 0, 0, 0);
const FREQUENCY: Dimensions = Dimensions::new(0, 0, -1, 0, 0, 0);
const SPEED: Dimensions = Dimensions::new(1, 0, -1, 0, 0, 0);
const TEMPERATURE: Dimensions = Dimensions::new(0, 0, 0, 1, 0, 0);
const DATA: Dimensions = Dimensions::new(0, 0, 0, 0, 1, 0);
const FORCE: Dimensions = Dimensions::new(1, 1, -2, 0, 0, 0);
const ENERGY: Dimensions = Dimensions::new(2, 1, -2, 0, 0, 0);
const POWER: Dimensions = Dimensions::new(2, 1, -3, 0, 0, 0);

// Scales are relative to SI base units (bits for data, radians for angles).
static UNITS: &[UnitDef] = &[
    def("m", &["meter", "meters", "metre", "metres"], LENGTH, 1.0),
    def("km", &["kilometer", "kilometers"], LENGTH, 1e3),
    def("cm", &["centimeter", "centimeters"], LENGTH, 1e-2),
    def("mm", &["millimeter", "millimeters"], LENGTH, 1e-3),
    def("um", &["micrometer", "micrometers"], LENGTH, 1e-6),
    def("nm", &["nanometer", "nanometers"], LENGTH, 1e-9),
    def("inch", &["inches"], LENGTH, 0.0254),
    def("ft", &["foot", "feet"], LENGTH, 0.3048),
    def("yd", &["yard", "yards"], LENGTH, 0.9144),
    def("mi", &["mile", "miles"], LENGTH, 1609.344),
    def("ha", &["hectare", "hectares"], AREA, 1e4),
    def("acre", &["acres"], AREA, 4046.856_422_4),
    def("L", &["l", "liter", "liters", "litre", "litres"], VOLUME, 1e-3),
    def("mL", &["ml", "milliliter", "milliliters"], VOLUME, 1e-6),
    def("gal", &["gallon", "gallons"], VOLUME, 0.003_785_411_784),
    def("kg", &["kilogram", "kilograms"], MASS, 1.0),
    def("g", &["gram", "grams"], MASS, 1e-3),
    def("mg", &["milligram", "milligrams"], MASS, 1e-6),
    def("tonne", &["tonnes"], MASS, 1e3),
    def("lb", &["lbs", "pound", "pounds"], MASS, 0.453_592_37),
    def("oz", &["ounce", "ounces"], MASS, 0.028_349_523_125),
    def("s", &["sec", "second", "seconds"], TIME, 1.0),
    def("ms", &["millisecond", "milliseconds"], TIME, 1e-3),
    def("min", &["minute", "minutes"], TIME, 60.0),
    def("h", &["hr", "hour", "hours"], TIME, 3600.0),
    def("day", &["days"], TIME, 86_400.0),
    def("week", &["weeks"], TIME, 604_800.0),
    def("year", &["years"], TIME, 31_557_600.0),
    def("Hz", &["hertz"], FREQUENCY, 1.0),
    def("kHz", &[], FREQUENCY, 1e3),
    def("MHz", &[], FREQUENCY, 1e6),
    def("GHz", &[], FREQUENCY, 1e9),
    def("mph", &[], SPEED, 0.447_04),
    def("K", &["kelvin"], TEMPERATURE, 1.0),
    def("b", &["bit", "bits"], DATA, 1.0),
    def("B", &["byte", "bytes"], DATA, 8.0),
    def("kB", &[], DATA, 8e3),
    def("MB", &[], DATA, 8e6),
    def("GB", &[], DATA, 8e9),
    def("TB", &[], DATA, 8e12),
    def("KiB", &[], DATA, 8.0 * 1024.0),
    def("MiB", &[], DATA, 8.0 * 1024.0 * 1024.0),
    def("GiB", &[], DATA, 8.0 * 1024.0 * 1024.0 * 1024.0),
    def("rad", &["radian", "radians"], Dimensions::ANGLE, 1.0),
    def("deg", &["degree", "degrees"], Dimensions::ANGLE, consts::PI / 180.0),
    def("N", &["newton", "newtons"], FORCE, 1.0),
    def("J", &["joule", "joules"], ENERGY, 1.0),
    def("kJ", &[], ENERGY, 1e3),
    def("cal", &["calorie", "calories"], ENERGY, 4.184),
    def("kcal", &[], ENERGY, 4184.0),
    def("Wh", &[], ENERGY, 3600.0),
    def("kWh", &[], ENERGY, 3.6e6),
    def("W", &["watt", "watts"], POWER, 1.0),
    def("kW", &[], POWER, 1e3),
];

impl UnitDef {
    pub fn find(name: &str) -> Option<&'static UnitDef> {
        UNITS
            .iter()
            .find(|unit| unit.symbol == name || unit.aliases.contains(&name))
    }
}

/// A product of unit definitions raised to integral powers, e.g. `km / h`.
/// The combined dimensions are checked whenever a unit is built.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Unit {
    factors: Vec<(&'static UnitDef, i32)>,
    dimensions: Dimensions,
}

impl From<&'static UnitDef> for Unit {
    fn from(def: &'static UnitDef) -> Self {
        Unit {
            factors: vec![(def, 1)],
            dimensions: def.dimensions,
        }
    }
}

impl Unit {
    pub fn find(name: &str) -> Option<Unit> {
        UnitDef::find(name).map(Unit::from)
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Factor converting a value in this unit to SI base units.
    pub fn scale(&self) -> f64 {
        self.factors
            .iter()
            .map(|(def, power)| def.scale.powi(*power))
            .product()
    }

    pub fn mul(&self, other: &Unit) -> Result<Unit, Runtime> {
        let dimensions = self
            .dimensions
            .checked_add(other.dimensions)
            .ok_or(Runtime::ExponentOverflow)?;
        let mut factors = self.factors.clone();
        for (def, power) in &other.factors {
            if let Some(existing) = factors.iter_mut().find(|(d, _)| std::ptr::eq(*d, *def)) {
                existing.1 = existing.1.checked_add(*power).ok_or(Runtime::ExponentOverflow)?;
            } else {
                factors.push((*def, *power));
            }
        }
        factors.retain(|(_, power)| *power != 0);
        Ok(Unit { factors, dimensions })
    }

    pub fn powi(&self, n: i32) -> Result<Unit, Runtime> {
        if n == 0 {
            return Ok(Unit::default());
        }
        let dimensions = self
            .dimensions
            .checked_mul(n)
            .ok_or(Runtime::ExponentOverflow)?;
        let factors = self
            .factors
            .iter()
            .map(|(def, power)| power.checked_mul(n).map(|power| (*def, power)))
            .collect::<Option<Vec<_>>>()
            .ok_or(Runtime::ExponentOverflow)?;
        Ok(Unit { factors, dimensions })
    }

    pub fn inverse(&self) -> Result<Unit, Runtime> {
        self.powi(-1)
    }
}

fn write_factor(def: &UnitDef, power: i32) -> String {
    if power == 1 {
        def.symbol.to_owned()
    } else {
        format!("{}^{}", def.symbol, power)
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (num, den): (Vec<_>, Vec<_>) = self.factors.iter().partition(|(_, power)| *power > 0);
        if num.is_empty() {
            return write!(
                f,
                "{}",
                den.iter().map(|(def, power)| write_factor(def, *power)).join(" ")
            );
        }
        write!(
            f,
            "{}",
            num.iter().map(|(def, power)| write_factor(def, *power)).join(" ")
        )?;
        if !den.is_empty() {
            write!(
                f,
                " / {}",
                den.iter().map(|(def, power)| write_factor(def, -*power)).join(" ")
            )?;
        }
        Ok(())
    }
}
