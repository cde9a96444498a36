//! Renderer-agnostic material descriptions.
//!
//! A [`Material`] records what the scene file said; the renderer turns it
//! into an evaluable BSDF once at world-build time.

use std::fmt;
use std::str::FromStr;

use glint_math::Vec3;
use thiserror::Error;

/// Index of a material in [`crate::Scene::materials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Which reflection model a material evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflectionModel {
    #[default]
    Lambert,
    CookTorrance,
    Smith,
}

/// Microfacet normal distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    #[default]
    Beckmann,
    Ggx,
}

/// Masking-shadowing term used by the Cook-Torrance model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowMasking {
    #[default]
    Beckmann,
    CookTorrance,
}

/// Whether the microsurface is a metal or an interface to a dielectric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceKind {
    #[default]
    Conductor,
    Dielectric,
}

/// Error returned when a keyword does not name a known variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{token}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub token: String,
}

/// A material parameter outside its valid range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    #[error("roughness {0} is outside (0, 1]")]
    Roughness(f32),

    #[error("F0 {0} has a channel outside [0, 1]")]
    F0(Vec3),
}

macro_rules! keyword_enum {
    ($ty:ident, $kind:literal, { $($word:literal => $variant:ident),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($word) {
                        return Ok($ty::$variant);
                    }
                )+
                Err(UnknownVariant {
                    kind: $kind,
                    token: s.to_string(),
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let word = match self {
                    $($ty::$variant => $word,)+
                };
                f.write_str(word)
            }
        }
    };
}

keyword_enum!(ReflectionModel, "reflection model", {
    "lambert" => Lambert,
    "cooktorrance" => CookTorrance,
    "smith" => Smith,
});

keyword_enum!(Distribution, "distribution", {
    "beckmann" => Beckmann,
    "ggx" => Ggx,
});

keyword_enum!(ShadowMasking, "shadow masking", {
    "beckmann" => Beckmann,
    "cooktorrance" => CookTorrance,
});

keyword_enum!(SurfaceKind, "surface kind", {
    "conductor" => Conductor,
    "dielectric" => Dielectric,
});

/// A material as declared by a `material` directive.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub model: ReflectionModel,
    pub distribution: Distribution,
    pub shadow_masking: ShadowMasking,
    pub surface: SurfaceKind,

    /// Emitted radiance; any nonzero channel makes this a light
    pub emissive: Vec3,

    /// Microfacet roughness in (0, 1]
    pub roughness: f32,

    /// Diffuse color (linear, unclamped)
    pub diffuse: Vec3,

    /// Reflectance at normal incidence, each channel in [0, 1]
    pub f0: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            model: ReflectionModel::Lambert,
            distribution: Distribution::Beckmann,
            shadow_masking: ShadowMasking::Beckmann,
            surface: SurfaceKind::Conductor,
            emissive: Vec3::ZERO,
            roughness: 0.5,
            diffuse: Vec3::splat(0.5),
            f0: Vec3::splat(0.04),
        }
    }
}

impl Material {
    /// A Lambertian material with the given diffuse color.
    pub fn lambert(diffuse: Vec3) -> Self {
        Self {
            diffuse,
            ..Default::default()
        }
    }

    /// A pure emitter.
    pub fn emitter(emissive: Vec3) -> Self {
        Self {
            emissive,
            diffuse: Vec3::ZERO,
            ..Default::default()
        }
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emissive != Vec3::ZERO
    }

    /// Check the range invariants, reporting the first violation.
    pub fn validate(&self) -> Result<(), MaterialError> {
        if !(self.roughness > 0.0 && self.roughness <= 1.0) {
            return Err(MaterialError::Roughness(self.roughness));
        }
        if self.f0.min_element() < 0.0 || self.f0.max_element() > 1.0 {
            return Err(MaterialError::F0(self.f0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_parse() {
        assert_eq!("lambert".parse(), Ok(ReflectionModel::Lambert));
        assert_eq!("CookTorrance".parse(), Ok(ReflectionModel::CookTorrance));
        assert_eq!("smith".parse(), Ok(ReflectionModel::Smith));
        assert_eq!("ggx".parse(), Ok(Distribution::Ggx));
        assert_eq!("cooktorrance".parse(), Ok(ShadowMasking::CookTorrance));
        assert_eq!("dielectric".parse(), Ok(SurfaceKind::Dielectric));
    }

    #[test]
    fn test_unknown_keyword() {
        let err = "phong".parse::<ReflectionModel>().unwrap_err();
        assert_eq!(err.token, "phong");
        assert_eq!(err.to_string(), "unknown reflection model `phong`");
    }

    #[test]
    fn test_display_round_trips() {
        for model in [
            ReflectionModel::Lambert,
            ReflectionModel::CookTorrance,
            ReflectionModel::Smith,
        ] {
            assert_eq!(model.to_string().parse(), Ok(model));
        }
    }

    #[test]
    fn test_emissive_is_light() {
        assert!(!Material::lambert(Vec3::ONE).is_emissive());
        assert!(Material::emitter(Vec3::new(0.0, 0.0, 1.0)).is_emissive());
    }

    #[test]
    fn test_validate() {
        assert!(Material::default().validate().is_ok());

        let rough = Material {
            roughness: 0.0,
            ..Default::default()
        };
        assert_eq!(rough.validate(), Err(MaterialError::Roughness(0.0)));
        assert_eq!(
            rough.validate().unwrap_err().to_string(),
            "roughness 0 is outside (0, 1]"
        );

        let f0 = Material {
            f0: Vec3::new(0.5, 1.2, 0.5),
            ..Default::default()
        };
        assert!(matches!(f0.validate(), Err(MaterialError::F0(_))));
    }
}
