// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Expert profiles: team-specific context appended to the service's prompt

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::payload::RequestType;

const UNITY_DESCRIPTION: &str = "
## Additional expert context
You are also an expert in Unity 2021.3 and C#:
- You are familiar with Unity DOTS and ECS patterns
- You understand the MonoBehaviour lifecycle precisely
- You follow the Microsoft C# coding conventions
- You consider Unity-specific optimizations such as object pooling and minimizing GC";

const UNITY_REVIEW: &str = "
## Additional expert context
You are also an expert in Unity 2021.3 and C#:
- You know Unity-specific bug patterns (coroutine leaks, null references)
- You identify MonoBehaviour lifecycle issues
- You detect C# performance anti-patterns (boxing, string concatenation)
- You know the Unity API and its correct usage
- You verify correct use of SerializeField, GetComponent and similar APIs";

const UNREAL_DESCRIPTION: &str = "
## Additional expert context
You are also an expert in Unreal Engine 5.7 and C++:
- You understand the UObject system, garbage collection and reflection
- You are familiar with Blueprint/C++ interaction
- You follow the Epic C++ coding standard
- You know UE5 features such as Nanite, Lumen and Mass Entity";

const UNREAL_REVIEW: &str = "
## Additional expert context
You are also an expert in Unreal Engine 5.7 and C++:
- You verify UE memory management (UPROPERTY, TSharedPtr, TWeakObjectPtr)
- You identify common UE bug patterns (GC timing, replicated variable sync)
- You detect C++ performance anti-patterns (needless copies, virtual call overhead)
- You know the Unreal API and its best practices
- You verify correct use of the UFUNCTION and UPROPERTY macros";

/// A named set of extra prompt text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpertProfile {
    /// No extra context
    #[default]
    Generic,
    /// Unity 2021.3 / C#
    Unity,
    /// Unreal Engine 5.7 / C++
    Unreal,
}

impl ExpertProfile {
    /// Every profile, in menu order
    pub const ALL: [Self; 3] = [Self::Generic, Self::Unity, Self::Unreal];

    /// Settings key of the profile
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Unity => "unity",
            Self::Unreal => "unreal",
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Generic => "General expert",
            Self::Unity => "Unity 2021.3 expert",
            Self::Unreal => "Unreal 5.7 expert",
        }
    }

    /// Built-in prompt text for a request type (empty for `generic`)
    #[must_use]
    pub fn prompt(self, request_type: RequestType) -> &'static str {
        match (self, request_type) {
            (Self::Generic, _) => "",
            (Self::Unity, RequestType::Description) => UNITY_DESCRIPTION,
            (Self::Unity, RequestType::Review) => UNITY_REVIEW,
            (Self::Unreal, RequestType::Description) => UNREAL_DESCRIPTION,
            (Self::Unreal, RequestType::Review) => UNREAL_REVIEW,
        }
    }

    /// Context sent as `expert_context`: a non-blank custom prompt wins
    #[must_use]
    pub fn context(self, request_type: RequestType, custom: Option<&str>) -> String {
        match custom.filter(|c| !c.trim().is_empty()) {
            Some(custom) => custom.to_string(),
            None => self.prompt(request_type).to_string(),
        }
    }
}

impl FromStr for ExpertProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown expert profile: {s} (expected generic, unity or unreal)")
            })
    }
}

impl fmt::Display for ExpertProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
