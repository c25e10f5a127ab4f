// Env values used in qingcloud services.
pub const QY_ACCESS_KEY_ID: &str = "QY_ACCESS_KEY_ID";
pub const QY_SECRET_ACCESS_KEY: &str = "QY_SECRET_ACCESS_KEY";
pub const QY_ZONE: &str = "QY_ZONE";
pub const QY_HOST: &str = "QY_HOST";
pub const QY_PORT: &str = "QY_PORT";
pub const QY_PROTOCOL: &str = "QY_PROTOCOL";
pub const QY_URI: &str = "QY_URI";

// Defaults of the public endpoint.
pub const DEFAULT_HOST: &str = "api.qingcloud.com";
pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_PROTOCOL: &str = "https";
pub const DEFAULT_URI: &str = "/iaas/";

// Request parameters injected by the assembler and the signer.
pub const PARAM_ACTION: &str = "action";
pub const PARAM_ZONE: &str = "zone";
pub const PARAM_EXPIRES: &str = "expires";
pub const PARAM_ACCESS_KEY_ID: &str = "access_key_id";
pub const PARAM_SIGNATURE: &str = "signature";

// Response fields.
pub const RET_CODE: &str = "ret_code";
pub const MESSAGE: &str = "message";
