use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// A unit within a category and its ratio to the category's base unit.
#[derive(Debug, Clone, Serialize)]
pub struct UnitDefinition {
    pub key: &'static str,
    pub symbol: &'static str,
    pub label: &'static str,
    pub ratio: Decimal,
}

const fn unit(
    key: &'static str,
    symbol: &'static str,
    label: &'static str,
    ratio: Decimal,
) -> UnitDefinition {
    UnitDefinition {
        key,
        symbol,
        label,
        ratio,
    }
}

/// Base unit: metre.
pub static LENGTH: [UnitDefinition; 8] = [
    unit("m", "m", "Meter", dec!(1)),
    unit("km", "km", "Kilometer", dec!(1000)),
    unit("cm", "cm", "Centimeter", dec!(0.01)),
    unit("mm", "mm", "Millimeter", dec!(0.001)),
    unit("mi", "mi", "Mile", dec!(1609.34)),
    unit("yd", "yd", "Yard", dec!(0.9144)),
    unit("ft", "ft", "Foot", dec!(0.3048)),
    unit("in", "in", "Inch", dec!(0.0254)),
];

/// Base unit: kilogram.
pub static WEIGHT: [UnitDefinition; 5] = [
    unit("kg", "kg", "Kilogram", dec!(1)),
    unit("g", "g", "Gram", dec!(0.001)),
    unit("mg", "mg", "Milligram", dec!(0.000001)),
    unit("lb", "lb", "Pound", dec!(0.453592)),
    unit("oz", "oz", "Ounce", dec!(0.0283495)),
];

/// Base unit: square metre.
pub static AREA: [UnitDefinition; 8] = [
    unit("m2", "m²", "Square Meter", dec!(1)),
    unit("km2", "km²", "Square Kilometer", dec!(1000000)),
    unit("cm2", "cm²", "Square Centimeter", dec!(0.0001)),
    unit("mm2", "mm²", "Square Millimeter", dec!(0.000001)),
    unit("ha", "ha", "Hectare", dec!(10000)),
    unit("acre", "acre", "Acre", dec!(4046.86)),
    unit("ft2", "ft²", "Square Foot", dec!(0.092903)),
    unit("in2", "in²", "Square Inch", dec!(0.00064516)),
];

/// Offset scales; the ratio is unused and conversion pivots through Celsius.
pub static TEMPERATURE: [UnitDefinition; 3] = [
    unit("c", "°C", "Celsius", dec!(1)),
    unit("f", "°F", "Fahrenheit", dec!(1)),
    unit("k", "K", "Kelvin", dec!(1)),
];
