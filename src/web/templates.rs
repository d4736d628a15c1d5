//! HTML 模板生成

use crate::core::ProxyRoutes;

/// 生成首页，表单直接提交到代理入口
///
/// 页面本身就是净化后的样子，旧浏览器也能正常显示。
pub fn index_page(routes: &ProxyRoutes) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>WebOne</title>
<link href="{stylesheet}" rel="stylesheet" type="text/css">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body>
<main>
<h1>WebOne</h1>
<p>Enter an address to read a lightweight version of the page.</p>
<form action="{entry_path}" method="get">
<input type="text" name="{entry_param}" size="40" placeholder="example.com">
<input type="submit" value="Go">
</form>
</main>
</body>
</html>
"#,
        stylesheet = routes.stylesheet_path,
        entry_path = routes.entry_path,
        entry_param = routes.entry_param,
    )
}
