mod payment;

pub use payment::{
    Payment, PaymentDraft, PaymentMethod, PaymentRequest, PaymentResponse, PaymentRow,
};
