mod employee_picker;
mod key_result;

pub use employee_picker::{EmployeePicker, PickerEvent};
pub use key_result::KeyResult;
