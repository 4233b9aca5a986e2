// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod deepai;
pub mod deepseek;
pub mod prompt;
pub mod razorpay;

pub use deepai::DeepAiClient;
pub use deepseek::DeepSeekClient;
pub use razorpay::RazorpayClient;
