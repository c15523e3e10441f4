// Domain layer: 資料模型與介面 (ports)，不依賴具體的 adapter 實作

pub mod model;
pub mod ports;
